/// Punctuation/operator kinds, plus the six meta-separators the parser
/// synthesizes (never produced directly by the lexer): prefix/postfix
/// increment/decrement, index, call.
///
/// `^` is exponentiation and `>|` is bitwise XOR — not the other way
/// around, and not the usual meanings in C-family languages. Preserve
/// this; it's load-bearing for anything that reads scripts in this
/// language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    Space,
    Assignment,
    Addition,
    AdditionAssignment,
    Subtraction,
    SubtractionAssignment,
    Multiplication,
    MultiplicationAssignment,
    Division,
    DivisionAssignment,
    Modulus,
    ModulusAssignment,
    Exponent,
    ExponentAssignment,
    Increment,
    Decrement,
    GroupOpen,
    GroupClose,
    SelectorOpen,
    SelectorClose,
    ScopeOpen,
    ScopeClose,
    Equality,
    InverseEquality,
    Greater,
    Lesser,
    GreaterEquality,
    LesserEquality,
    LogicalOr,
    LogicalAnd,
    LogicalNot,
    BitwiseOr,
    BitwiseOrAssignment,
    BitwiseXor,
    BitwiseXorAssignment,
    BitwiseAnd,
    BitwiseAndAssignment,
    BitwiseNot,
    ShiftRight,
    ShiftRightAssignment,
    ShiftLeft,
    ShiftLeftAssignment,
    Seek,
    Ternary,
    Dot,
    Arrow,
    List,
    Length,
    Ellipsis,
    EndStatement,
    NewObject,
    NamespaceIndex,

    // Meta-separators, synthesized by the parser.
    PrefixIncrement,
    PostfixIncrement,
    PrefixDecrement,
    PostfixDecrement,
    Index,
    Call,
}

/// Precedence (0-10, higher binds tighter) and arity-hint for a separator,
/// per the table in the language reference.
#[derive(Debug, Clone, Copy)]
pub struct SeparatorInfo {
    pub precedence: u8,
    pub single_operand: bool,
}

impl Separator {
    pub const fn info(self) -> SeparatorInfo {
        use Separator::*;
        let (precedence, single_operand) = match self {
            Space | ScopeOpen | ScopeClose | List | Ellipsis | EndStatement => (0, false),
            Assignment => (1, false),
            AdditionAssignment
            | SubtractionAssignment
            | MultiplicationAssignment
            | DivisionAssignment
            | ModulusAssignment
            | ExponentAssignment
            | BitwiseOrAssignment
            | BitwiseXorAssignment
            | BitwiseAndAssignment
            | ShiftRightAssignment
            | ShiftLeftAssignment => (2, false),
            Ternary => (2, false),
            LogicalOr | LogicalAnd => (3, false),
            Equality | InverseEquality | Greater | Lesser | GreaterEquality | LesserEquality => {
                (4, false)
            }
            Addition | Subtraction => (5, false),
            Multiplication | Division | Modulus => (6, false),
            BitwiseOr | BitwiseXor | BitwiseAnd | ShiftLeft | ShiftRight => (7, false),
            Exponent => (8, false),
            Increment | Decrement | LogicalNot | BitwiseNot | Length | NewObject => (9, true),
            PrefixIncrement | PostfixIncrement | PrefixDecrement | PostfixDecrement => (9, true),
            GroupOpen | GroupClose | SelectorOpen | SelectorClose | Seek | Dot | Arrow
            | NamespaceIndex | Index | Call => (10, false),
        };
        SeparatorInfo {
            precedence,
            single_operand,
        }
    }

    pub const fn precedence(self) -> u8 {
        self.info().precedence
    }

    pub const fn is_single_operand(self) -> bool {
        self.info().single_operand
    }

    /// Whether this is one of the `X=` compound-assignment operators
    /// (plain `=` is not included).
    pub const fn is_compound_assignment(self) -> bool {
        use Separator::*;
        matches!(
            self,
            AdditionAssignment
                | SubtractionAssignment
                | MultiplicationAssignment
                | DivisionAssignment
                | ModulusAssignment
                | ExponentAssignment
                | BitwiseOrAssignment
                | BitwiseXorAssignment
                | BitwiseAndAssignment
                | ShiftRightAssignment
                | ShiftLeftAssignment
        )
    }

    /// The non-assignment operator underlying a compound-assignment
    /// separator, e.g. `+=` -> `+`.
    pub const fn underlying_arithmetic(self) -> Option<Separator> {
        use Separator::*;
        Some(match self {
            AdditionAssignment => Addition,
            SubtractionAssignment => Subtraction,
            MultiplicationAssignment => Multiplication,
            DivisionAssignment => Division,
            ModulusAssignment => Modulus,
            ExponentAssignment => Exponent,
            BitwiseOrAssignment => BitwiseOr,
            BitwiseXorAssignment => BitwiseXor,
            BitwiseAndAssignment => BitwiseAnd,
            ShiftRightAssignment => ShiftRight,
            ShiftLeftAssignment => ShiftLeft,
            _ => return None,
        })
    }
}
