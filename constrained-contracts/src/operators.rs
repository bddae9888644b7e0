//! Operator overloads for [`Expr`]
//!
//! Arithmetic and bitwise operators on an expression record the operation
//! instead of performing it. Plain numbers on the left-hand side produce the
//! reflected form, so `10 - x` records `10 - X` rather than `X - 10`.
//!
//! `/` records true division and `!` records bitwise inversion. Comparison
//! operators cannot be recorded through `PartialEq`/`PartialOrd` since those
//! must return `bool`; use [`Expr::eq`], [`Expr::lt`] and friends instead.

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::expr::Expr;

macro_rules! impl_binary_operator {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $ctor:ident, $reflected:ident) => {
        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                Expr::$ctor(&self, rhs)
            }
        }

        impl<T: Into<Expr>> $trait<T> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                Expr::$ctor(self, rhs)
            }
        }

        impl<T: Into<Expr>> $assign_trait<T> for Expr {
            fn $assign_method(&mut self, rhs: T) {
                *self = Expr::$ctor(self, rhs);
            }
        }

        impl_binary_operator!(@reflected $trait, $method, $reflected, i32, i64, f64);
    };
    (@reflected $trait:ident, $method:ident, $reflected:ident, $($lhs:ty),*) => {
        $(
            impl $trait<Expr> for $lhs {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    rhs.$reflected(self)
                }
            }

            impl $trait<&Expr> for $lhs {
                type Output = Expr;

                fn $method(self, rhs: &Expr) -> Expr {
                    rhs.$reflected(self)
                }
            }
        )*
    };
}

impl_binary_operator!(Add, add, AddAssign, add_assign, add, radd);
impl_binary_operator!(Sub, sub, SubAssign, sub_assign, sub, rsub);
impl_binary_operator!(Mul, mul, MulAssign, mul_assign, mul, rmul);
impl_binary_operator!(Div, div, DivAssign, div_assign, true_div, rtrue_div);
impl_binary_operator!(Rem, rem, RemAssign, rem_assign, modulo, rmodulo);
impl_binary_operator!(Shl, shl, ShlAssign, shl_assign, lshift, rlshift);
impl_binary_operator!(Shr, shr, ShrAssign, shr_assign, rshift, rrshift);
impl_binary_operator!(BitAnd, bitand, BitAndAssign, bitand_assign, bitand, rbitand);
impl_binary_operator!(BitOr, bitor, BitOrAssign, bitor_assign, bitor, rbitor);
impl_binary_operator!(BitXor, bitxor, BitXorAssign, bitxor_assign, bitxor, rbitxor);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::neg(&self)
    }
}

impl Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::neg(self)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.invert()
    }
}

impl Not for &Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        self.invert()
    }
}
