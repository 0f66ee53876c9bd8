//! The generator: consumes directives and definitions in arrival order
//! and emits one Java class per concrete node, an abstract placeholder
//! class per multi-alternative syntax rule, and -- once the whole input
//! has been seen -- the optional root and visitor classes.

use std::collections::HashMap;

use astgen_core::{Definition, FieldDef, NodeDef, ParseHandler, TypeExpr};

use crate::sink::{ArtifactSink, EmitError, FILE_EXT};

/// Generated classes with no registered supertype extend this.
const DEFAULT_ROOT: &str = "Object";

/// Stateful emitter for the generated class hierarchy.
///
/// Implements [`ParseHandler`], so the parser drives it directly. All
/// cross-reference state (alias bindings, supertype bindings, visitor
/// signatures) lives on the instance; redefinitions warn and the last
/// binding wins.
pub struct Generator<'a> {
    sink: &'a mut dyn ArtifactSink,

    // Parameters, set through directives or the driver.
    root: String,
    generate_root: bool,
    visitor: Option<String>,
    modifier: Option<String>,
    package: Option<String>,
    exception: Option<String>,
    source: Option<String>,
    author: Option<String>,
    version: Option<String>,
    message: Option<String>,
    use_lineno: bool,

    // Cross-reference tables.
    aliases: HashMap<String, TypeExpr>,
    supertypes: HashMap<String, String>,
    visit_methods: Vec<String>,

    // Supertype for concrete nodes of the rule being processed.
    current_super: String,

    warnings: Vec<String>,
    failures: Vec<EmitError>,
}

impl<'a> Generator<'a> {
    pub fn new(sink: &'a mut dyn ArtifactSink) -> Self {
        Generator {
            sink,
            root: DEFAULT_ROOT.to_owned(),
            generate_root: false,
            visitor: None,
            modifier: None,
            package: None,
            exception: None,
            source: None,
            author: None,
            version: None,
            message: None,
            use_lineno: false,
            aliases: HashMap::new(),
            supertypes: HashMap::new(),
            visit_methods: Vec::new(),
            current_super: DEFAULT_ROOT.to_owned(),
            warnings: Vec::new(),
            failures: Vec::new(),
        }
    }

    // -- Parameters ---------------------------------------------

    pub fn set_root(&mut self, root: &str) {
        self.root = root.to_owned();
    }

    pub fn set_generate_root(&mut self, flag: bool) {
        self.generate_root = flag;
    }

    pub fn set_visitor(&mut self, visitor: &str) {
        self.visitor = Some(visitor.to_owned());
    }

    pub fn set_modifier(&mut self, modifier: &str) {
        self.modifier = Some(modifier.to_owned());
    }

    pub fn set_package(&mut self, package: &str) {
        self.package = Some(package.to_owned());
    }

    pub fn set_exception(&mut self, exception: &str) {
        self.exception = Some(exception.to_owned());
    }

    pub fn set_source(&mut self, source: &str) {
        self.source = Some(source.to_owned());
    }

    pub fn set_author(&mut self, author: &str) {
        self.author = Some(author.to_owned());
    }

    pub fn set_version(&mut self, version: &str) {
        self.version = Some(version.to_owned());
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = Some(message.to_owned());
    }

    pub fn set_use_lineno(&mut self, flag: bool) {
        self.use_lineno = flag;
    }

    // -- Diagnostics --------------------------------------------

    /// Non-fatal warnings accumulated so far, in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Artifact writes that failed; the run continued past each.
    pub fn emit_failures(&self) -> &[EmitError] {
        &self.failures
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    // -- Definition processing ----------------------------------

    fn define_alias(&mut self, name: String, ty: TypeExpr, line: u32) {
        if self.aliases.contains_key(&name) {
            self.warn(format!("redefinition of '{}' (line {})", name, line));
        }
        self.aliases.insert(name, ty);
    }

    fn define_syntax(&mut self, name: String, nodes: Vec<NodeDef>, line: u32) {
        let direct =
            matches!(nodes.as_slice(), [NodeDef::Concrete { name: n, .. }] if *n == name);
        if direct {
            // The rule's single alternative is the class itself; no
            // placeholder is emitted for the rule name.
            self.current_super = self.supertype_of(&name);
        } else {
            if name != self.root {
                let supername = self.supertype_of(&name);
                let text = self.render_abstract_class(&name, &supername);
                self.write_artifact(&name, &text);
            }
            self.current_super = name.clone();
        }
        for node in nodes {
            match node {
                NodeDef::Concrete { name, fields } => self.emit_node_class(&name, &fields),
                NodeDef::Abstract { name } => self.register_supertype(name, line),
            }
        }
    }

    fn register_supertype(&mut self, name: String, line: u32) {
        if self.supertypes.contains_key(&name) {
            self.warn(format!("redefinition of '{}' (line {})", name, line));
        }
        self.supertypes.insert(name, self.current_super.clone());
    }

    fn supertype_of(&self, name: &str) -> String {
        self.supertypes
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.root.clone())
    }

    // -- Emission -----------------------------------------------

    fn emit_node_class(&mut self, name: &str, fields: &[FieldDef]) {
        let mut out = String::new();
        self.push_banner(&mut out, name);
        if let Some(pkg) = &self.package {
            out.push_str(&format!("package {};\n", pkg));
        }
        if let Some(m) = &self.modifier {
            out.push_str(&format!("{} ", m));
        }
        out.push_str(&format!(
            "class {} extends {} {{\n",
            name, self.current_super
        ));

        // fields
        if self.use_lineno {
            out.push_str("    private int __lineno;\n");
        }
        for f in fields {
            out.push_str(&format!(
                "    private {} {};\n",
                self.render_type(&f.ty),
                f.name
            ));
        }

        // constructor
        let mut params = Vec::new();
        if self.use_lineno {
            params.push("int __lineno".to_owned());
        }
        for f in fields {
            params.push(format!("{} {}", self.render_type(&f.ty), f.name));
        }
        out.push_str(&format!("    public {} ({}) {{\n", name, params.join(", ")));
        if self.use_lineno {
            out.push_str("        this.__lineno = __lineno;\n");
        }
        for f in fields {
            out.push_str(&format!("        this.{} = {};\n", f.name, f.name));
        }
        out.push_str("    }\n");

        // accessors
        if self.use_lineno {
            out.push_str("    public int getLineNo () { return __lineno; }\n");
        }
        for f in fields {
            out.push_str(&format!(
                "    public {} get{} () {{ return {}; }}\n",
                self.render_type(&f.ty),
                capitalize(&f.name),
                f.name
            ));
        }

        // visitor hook
        let mut visit_method = None;
        if let Some(visitor) = &self.visitor {
            let throws = match &self.exception {
                Some(e) => format!(" throws {}", e),
                None => String::new(),
            };
            out.push_str(&format!(
                "    public void accept ({} v){} {{\n",
                visitor, throws
            ));
            out.push_str(&format!("        v.visit{}(this);\n", name));
            out.push_str("    }\n");
            visit_method = Some(format!("void visit{} ({} n){}", name, name, throws));
        }
        out.push_str("}\n");

        if let Some(vm) = visit_method {
            self.visit_methods.push(vm);
        }
        self.write_artifact(name, &out);
    }

    fn render_abstract_class(&self, name: &str, supername: &str) -> String {
        let mut out = String::new();
        self.push_banner(&mut out, name);
        if let Some(pkg) = &self.package {
            out.push_str(&format!("package {};\n", pkg));
        }
        if let Some(m) = &self.modifier {
            out.push_str(&format!("{} ", m));
        }
        out.push_str(&format!("abstract class {} extends {} {{}}\n", name, supername));
        out
    }

    /// Render a type, resolving aliases. An alias may bind to another
    /// alias or to an array type, so resolution recurses.
    fn render_type(&self, ty: &TypeExpr) -> String {
        match ty {
            TypeExpr::Prim(name) => match self.aliases.get(name) {
                Some(aliased) => self.render_type(aliased),
                None => name.clone(),
            },
            TypeExpr::Array(elem) => format!("{}[]", self.render_type(elem)),
        }
    }

    fn push_banner(&self, out: &mut String, name: &str) {
        out.push_str(&format!("// {}{}\n", name, FILE_EXT));
        if let Some(msg) = &self.message {
            out.push_str(msg);
            out.push('\n');
        }
        if self.source.is_some() || self.version.is_some() || self.author.is_some() {
            out.push_str("//");
            if let Some(s) = &self.source {
                out.push_str(&format!(" Source: {}", s));
            }
            if let Some(v) = &self.version {
                out.push_str(&format!(" Version: {}", v));
            }
            if let Some(a) = &self.author {
                out.push_str(&format!(" Author: {}", a));
            }
            out.push('\n');
        }
    }

    fn write_artifact(&mut self, name: &str, contents: &str) {
        if let Err(source) = self.sink.write_artifact(name, contents) {
            self.failures.push(EmitError {
                artifact: name.to_owned(),
                source,
            });
        }
    }

    // -- Finishing ----------------------------------------------

    /// Emit the artifacts that depend on the whole input: the root
    /// class (if requested) and the visitor class (if a visitor name
    /// was set). Call once, after parsing completes.
    pub fn finish(&mut self) {
        if self.generate_root {
            self.emit_root_class();
        }
        if self.visitor.is_some() {
            self.emit_visitor_class();
        }
    }

    fn emit_root_class(&mut self) {
        let root = self.root.clone();
        let mut out = String::new();
        self.push_banner(&mut out, &root);
        if let Some(pkg) = &self.package {
            out.push_str(&format!("package {};\n", pkg));
        }
        if let Some(m) = &self.modifier {
            out.push_str(&format!("{} ", m));
        }
        out.push_str(&format!("abstract class {} {{", root));
        if let Some(visitor) = &self.visitor {
            out.push('\n');
            out.push_str(&format!("    public abstract void accept ({} v)", visitor));
            if let Some(e) = &self.exception {
                out.push_str(&format!(" throws {}", e));
            }
            out.push_str(";\n");
        }
        out.push_str("}\n");
        self.write_artifact(&root, &out);
    }

    fn emit_visitor_class(&mut self) {
        let Some(visitor) = self.visitor.clone() else {
            return;
        };
        let mut out = String::new();
        self.push_banner(&mut out, &visitor);
        if let Some(pkg) = &self.package {
            out.push_str(&format!("package {};\n", pkg));
        }
        if let Some(m) = &self.modifier {
            out.push_str(&format!("{} ", m));
        }
        out.push_str(&format!("abstract class {} {{\n", visitor));
        for vm in &self.visit_methods {
            out.push_str(&format!("    public abstract {};\n", vm));
        }
        out.push_str("}\n");
        self.write_artifact(&visitor, &out);
    }
}

impl ParseHandler for Generator<'_> {
    fn handle_command(&mut self, name: &str, value: &str) {
        match name.to_ascii_lowercase().as_str() {
            "root" => self.set_root(value),
            "generate_root" => {
                if value.eq_ignore_ascii_case("yes") {
                    self.set_generate_root(true);
                }
            }
            "visitor" => self.set_visitor(value),
            "package" => self.set_package(value),
            "exception" => self.set_exception(value),
            "modifier" => self.set_modifier(value),
            "use_lineno" => {
                if value.eq_ignore_ascii_case("yes") {
                    self.set_use_lineno(true);
                }
            }
            "author" => self.set_author(value),
            "version" => self.set_version(value),
            _ => self.warn(format!("unknown command '{}'", name)),
        }
    }

    fn handle_definition(&mut self, def: Definition) {
        match def {
            Definition::Alias { name, ty, line } => self.define_alias(name, ty, line),
            Definition::Syntax { name, nodes, line } => self.define_syntax(name, nodes, line),
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
