//! Symbolic expressions
//!
//! An [`Expr`] records operations performed on a placeholder value instead of
//! performing them. The recorded tree is replayed later against a concrete
//! value by [`crate::evaluator::evaluate`].
//!
//! ```
//! use constrained_contracts::Expr;
//! use constrained_core::Value;
//!
//! let x = Expr::root();
//! let size = x.mul(2).add(1).ge(5);
//!
//! assert_eq!(size.evaluate(&Value::Integer(3)), Ok(Value::Boolean(true)));
//! assert_eq!(size.evaluate(&Value::Integer(-100)), Ok(Value::Boolean(false)));
//! ```
//!
//! Every constructor returns a new node and leaves the receiver untouched.
//! Trees are immutable and share their children, so the same tree may be
//! evaluated against many values, including from several threads at once.

use std::fmt;
use std::sync::Arc;

use constrained_core::{BinaryOp, UnaryOp, Value, ValueResult};

/// A recorded operation chain over the bound value
#[derive(Debug, Clone)]
pub enum Expr {
    /// The placeholder; evaluates to the bound value
    Root,

    /// A concrete operand captured at construction time
    Literal(Value),

    Unary {
        op: UnaryOp,
        operand: Arc<Expr>,
    },

    Binary {
        op: BinaryOp,
        lhs: Arc<Expr>,
        rhs: Arc<Expr>,
    },

    /// Subscript `target[key]`
    Index { target: Arc<Expr>, key: Arc<Expr> },

    /// Attribute access `target.name`
    Attr { target: Arc<Expr>, name: String },

    /// Call `target(args..)`
    Call { target: Arc<Expr>, args: Vec<Expr> },
}

macro_rules! unary_constructors {
    ($($(#[$doc:meta])* $name:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> Expr {
                self.unary(UnaryOp::$op)
            }
        )*
    };
}

macro_rules! binary_constructors {
    ($($(#[$doc:meta])* $name:ident, $reflected:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, other: impl Into<Expr>) -> Expr {
                self.binary(BinaryOp::$op, other)
            }

            /// Reflected form with `other` as the left operand
            pub fn $reflected(&self, other: impl Into<Expr>) -> Expr {
                self.reflected(BinaryOp::$op, other)
            }
        )*
    };
}

macro_rules! comparison_constructors {
    ($($(#[$doc:meta])* $name:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, other: impl Into<Expr>) -> Expr {
                self.binary(BinaryOp::$op, other)
            }
        )*
    };
}

#[allow(clippy::should_implement_trait)]
impl Expr {
    /// The placeholder standing for the value under test
    pub fn root() -> Self {
        Expr::Root
    }

    /// A concrete operand
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    fn unary(&self, op: UnaryOp) -> Expr {
        Expr::Unary {
            op,
            operand: Arc::new(self.clone()),
        }
    }

    fn binary(&self, op: BinaryOp, other: impl Into<Expr>) -> Expr {
        Expr::Binary {
            op,
            lhs: Arc::new(self.clone()),
            rhs: Arc::new(other.into()),
        }
    }

    fn reflected(&self, op: BinaryOp, other: impl Into<Expr>) -> Expr {
        Expr::Binary {
            op,
            lhs: Arc::new(other.into()),
            rhs: Arc::new(self.clone()),
        }
    }

    unary_constructors! {
        /// `-self`
        neg => Neg,
        /// `+self`
        pos => Pos,
        /// `~self` (bitwise inversion)
        invert => Invert,
        /// `abs(self)`
        abs => Abs,
        /// Integer coercion of `self`
        to_index => Index,
        /// Structural hash of `self`
        hash => Hash,
        /// `self` with its elements in reverse order
        reversed => Reversed,
    }

    binary_constructors! {
        /// `self + other`
        add, radd => Add,
        /// `self - other`
        sub, rsub => Sub,
        /// `self * other`
        mul, rmul => Mul,
        /// `self // other`, rounding toward negative infinity
        floor_div, rfloor_div => FloorDiv,
        /// `self / other`, always a float
        true_div, rtrue_div => TrueDiv,
        /// `self % other`, sign follows the divisor
        modulo, rmodulo => Mod,
        /// `self ** other`
        pow, rpow => Pow,
        /// `self << other`
        lshift, rlshift => LShift,
        /// `self >> other`
        rshift, rrshift => RShift,
        /// `self & other`
        bitand, rbitand => BitAnd,
        /// `self | other`
        bitor, rbitor => BitOr,
        /// `self ^ other`
        bitxor, rbitxor => BitXor,
        /// `[self // other, self % other]`
        divmod, rdivmod => DivMod,
    }

    comparison_constructors! {
        /// `self == other`
        eq => Eq,
        /// `self != other`
        ne => Ne,
        /// `self < other`
        lt => Lt,
        /// `self <= other`
        le => Le,
        /// `self > other`
        gt => Gt,
        /// `self >= other`
        ge => Ge,
        /// Three-way comparison yielding -1, 0 or 1
        cmp => Cmp,
    }

    /// `item in self`
    pub fn contains(&self, item: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Contains, item)
    }

    /// `self[key]`
    pub fn getitem(&self, key: impl Into<Expr>) -> Expr {
        Expr::Index {
            target: Arc::new(self.clone()),
            key: Arc::new(key.into()),
        }
    }

    /// `self.name`
    pub fn getattr(&self, name: impl Into<String>) -> Expr {
        Expr::Attr {
            target: Arc::new(self.clone()),
            name: name.into(),
        }
    }

    /// `self(args..)`
    pub fn call<I, A>(&self, args: I) -> Expr
    where
        I: IntoIterator<Item = A>,
        A: Into<Expr>,
    {
        Expr::Call {
            target: Arc::new(self.clone()),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `self()`
    pub fn invoke(&self) -> Expr {
        self.call(std::iter::empty::<Expr>())
    }

    /// `self.name(args..)`
    pub fn method<I, A>(&self, name: impl Into<String>, args: I) -> Expr
    where
        I: IntoIterator<Item = A>,
        A: Into<Expr>,
    {
        self.getattr(name).call(args)
    }

    /// Replay the recorded operations with `bound` as the root value
    pub fn evaluate(&self, bound: &Value) -> ValueResult<Value> {
        crate::evaluator::evaluate(self, bound)
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Expr::Root)
    }

    /// Whether the tree refers to the bound value at all
    pub fn references_root(&self) -> bool {
        match self {
            Expr::Root => true,
            Expr::Literal(_) => false,
            Expr::Unary { operand, .. } => operand.references_root(),
            Expr::Binary { lhs, rhs, .. } => lhs.references_root() || rhs.references_root(),
            Expr::Index { target, key } => target.references_root() || key.references_root(),
            Expr::Attr { target, .. } => target.references_root(),
            Expr::Call { target, args } => {
                target.references_root() || args.iter().any(Expr::references_root)
            }
        }
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        1 + match self {
            Expr::Root | Expr::Literal(_) => 0,
            Expr::Unary { operand, .. } => operand.size(),
            Expr::Binary { lhs, rhs, .. } => lhs.size() + rhs.size(),
            Expr::Index { target, key } => target.size() + key.size(),
            Expr::Attr { target, .. } => target.size(),
            Expr::Call { target, args } => target.size() + args.iter().map(Expr::size).sum::<usize>(),
        }
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

macro_rules! literal_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Expr::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(bool, i32, i64, usize, f64, &str, String, Vec<Value>);

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Root => write!(f, "X"),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Unary { op, operand } if op.is_prefix() => write!(f, "{}{}", op.symbol(), operand),
            Expr::Unary { op, operand } => write!(f, "{}({})", op.symbol(), operand),
            Expr::Binary {
                op: BinaryOp::Contains,
                lhs,
                rhs,
            } => write!(f, "({} in {})", rhs, lhs),
            Expr::Binary { op, lhs, rhs } if op.is_call_style() => {
                write!(f, "{}({}, {})", op.symbol(), lhs, rhs)
            }
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Index { target, key } => write!(f, "{}[{}]", target, key),
            Expr::Attr { target, name } => write!(f, "{}.{}", target, name),
            Expr::Call { target, args } => {
                write!(f, "{}(", target)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
