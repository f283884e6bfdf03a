//! Definition payloads: what a class-definition block declares.

use smallvec::SmallVec;

/// A method declared on a class.
///
/// `has_return` decides how call sites connect: a returning method is an
/// expression (output connection), a non-returning one is a statement
/// (previous/next connections).
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub params: SmallVec<[String; 4]>,
    pub has_return: bool,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, params: &[&str], has_return: bool) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| (*p).to_string()).collect(),
            has_return,
        }
    }
}

/// A class's constructor signature. Absent means the class constructs with
/// no arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDef {
    pub params: SmallVec<[String; 4]>,
}

impl ConstructorDef {
    pub fn new(params: &[&str]) -> Self {
        Self {
            params: params.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// One user-declared class: name, constructor, methods, attributes, and the
/// cosmetic hue tag assigned at creation.
///
/// `name` is unique among all class definitions in a workspace, except
/// transiently inside a rename cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub constructor: Option<ConstructorDef>,
    pub methods: Vec<MethodDef>,
    pub attributes: Vec<String>,
    /// Assigned once from the workspace colour wheel; stable for the
    /// class's lifetime.
    pub hue: f32,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, hue: f32) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            methods: Vec::new(),
            attributes: Vec::new(),
            hue,
        }
    }

    /// Find a method by name (exact match; callers needing the host's
    /// name-equality rules go through the engine registry instead).
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodDef> {
        self.methods.iter_mut().find(|m| m.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}
