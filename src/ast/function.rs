use super::{Ast, ParseNode};

/// How a function declaration's name binds, from its `local`/`const`
/// prefix tags: `{local, const}` -> `Constant`; `{const}` alone ->
/// `GlobalConstant`; `{local}` alone -> `Basic`; neither -> `Global`.
///
/// Constness is accepted but not enforced: the language reference
/// describes the tag combinations but no reassignment-rejection
/// mechanism for them, so `quill` records the tag and places the
/// function in local vs. global scope accordingly, without raising an
/// error on a later reassignment (an open question resolved this way in
/// DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionTag {
    Basic,
    Constant,
    GlobalConstant,
    Global,
}

impl FunctionTag {
    pub fn from_flags(local: bool, const_: bool) -> Self {
        match (local, const_) {
            (true, true) => FunctionTag::Constant,
            (false, true) => FunctionTag::GlobalConstant,
            (true, false) => FunctionTag::Basic,
            (false, false) => FunctionTag::Global,
        }
    }

    pub fn is_local(self) -> bool {
        matches!(self, FunctionTag::Basic | FunctionTag::Constant)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Box<ParseNode>,
    pub params: Vec<Param>,
    pub body: Box<ParseNode>,
    pub tag: FunctionTag,
}

impl FunctionDecl {
    /// A synthetic `this` parameter is prepended for method-declaration
    /// syntax (`T.f(...)`, recognized by the name's top-level `.`).
    pub fn prepend_this(params: &mut Vec<Param>) {
        params.insert(
            0,
            Param {
                name: "this".to_owned(),
            },
        );
    }

    pub fn ast_name(&self) -> Option<&Ast> {
        match self.name.as_ref() {
            ParseNode::Expression(ast) => Some(ast),
            _ => None,
        }
    }
}
