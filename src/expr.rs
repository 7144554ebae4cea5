use core::fmt;
use std::{mem, sync::Arc};

pub type Integer = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    value: Integer,
}

impl Leaf {
    pub fn new(value: Integer) -> Self {
        Self { value }
    }

    pub fn evaluate(&self) -> Integer {
        self.value
    }
}

/// Addition of two subtrees.
///
/// Children sit behind `Arc`, so wrapping an existing tree in a new `Sum`
/// shares it instead of copying, and the tree it came from stays valid.
///
/// Every traversal below keeps its own work stack, so a tree may be as deep
/// as memory allows.
#[derive(Clone, PartialEq, Eq)]
pub struct Sum {
    lhs: Arc<Expr>,
    rhs: Arc<Expr>,
}

impl Sum {
    pub fn new(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: Arc::new(lhs.into()),
            rhs: Arc::new(rhs.into()),
        }
    }

    pub fn from_integers(a: Integer, b: Integer) -> Self {
        Self::new(Leaf::new(a), Leaf::new(b))
    }

    /// Returns `(self + rhs)` as a new node. `self` is left untouched.
    pub fn add(&self, rhs: impl Into<Expr>) -> Sum {
        Sum::new(self.clone(), rhs)
    }

    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    /// Overflow past `Integer` wraps. See [`crate::eval::evaluate`] for the
    /// checked form.
    pub fn evaluate(&self) -> Integer {
        self.lhs().evaluate().wrapping_add(self.rhs().evaluate())
    }
}

// Moves uniquely owned child sums onto `pending` so that nested drops never
// recurse more than one level.
fn detach(child: &mut Arc<Expr>, pending: &mut Vec<Sum>) {
    if let Some(expr) = Arc::get_mut(child) {
        if let Expr::Sum(sum) = mem::replace(expr, Expr::Leaf(Leaf::new(0))) {
            pending.push(sum);
        }
    }
}

impl Drop for Sum {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach(&mut self.lhs, &mut pending);
        detach(&mut self.rhs, &mut pending);

        while let Some(mut sum) = pending.pop() {
            detach(&mut sum.lhs, &mut pending);
            detach(&mut sum.rhs, &mut pending);
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Leaf(Leaf),
    Sum(Sum),
}

impl Expr {
    /// Builds a left-leaning chain `((v0 + v1) + v2) + ...`.
    ///
    /// A single value yields a lone leaf, an empty sequence yields `None`.
    pub fn chain<I>(values: I) -> Option<Expr>
    where
        I: IntoIterator<Item = Integer>,
    {
        let mut values = values.into_iter();
        let first = values.next()?;
        let Some(second) = values.next() else {
            return Some(Expr::Leaf(Leaf::new(first)));
        };

        let sum = values.fold(Sum::from_integers(first, second), |sum, value| {
            sum.add(value)
        });
        Some(Expr::Sum(sum))
    }

    /// Wrapping addition is associative, so leaves are summed in visit order.
    pub fn evaluate(&self) -> Integer {
        let mut total: Integer = 0;
        let mut stack = vec![self];

        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Leaf(leaf) => total = total.wrapping_add(leaf.evaluate()),
                Expr::Sum(sum) => {
                    stack.push(sum.rhs());
                    stack.push(sum.lhs());
                }
            }
        }

        total
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(self, 1)];

        while let Some((expr, level)) = stack.pop() {
            match expr {
                Expr::Leaf(_) => depth = depth.max(level),
                Expr::Sum(sum) => {
                    stack.push((sum.rhs(), level + 1));
                    stack.push((sum.lhs(), level + 1));
                }
            }
        }

        depth
    }

    pub fn leaves(&self) -> usize {
        let mut leaves = 0;
        let mut stack = vec![self];

        while let Some(expr) = stack.pop() {
            match expr {
                Expr::Leaf(_) => leaves += 1,
                Expr::Sum(sum) => {
                    stack.push(sum.rhs());
                    stack.push(sum.lhs());
                }
            }
        }

        leaves
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];

        while let Some(pair) = stack.pop() {
            match pair {
                (Expr::Leaf(a), Expr::Leaf(b)) => {
                    if a != b {
                        return false;
                    }
                }
                (Expr::Sum(a), Expr::Sum(b)) => {
                    if !Arc::ptr_eq(&a.rhs, &b.rhs) {
                        stack.push((a.rhs(), b.rhs()));
                    }
                    if !Arc::ptr_eq(&a.lhs, &b.lhs) {
                        stack.push((a.lhs(), b.lhs()));
                    }
                }
                _ => return false,
            }
        }

        true
    }
}

impl Eq for Expr {}

impl From<Integer> for Expr {
    fn from(value: Integer) -> Self {
        Expr::Leaf(Leaf::new(value))
    }
}

impl From<Leaf> for Expr {
    fn from(leaf: Leaf) -> Self {
        Expr::Leaf(leaf)
    }
}

impl From<Sum> for Expr {
    fn from(sum: Sum) -> Self {
        Expr::Sum(sum)
    }
}

enum Piece<'a> {
    Expr(&'a Expr),
    Text(&'static str),
}

fn write_pieces(f: &mut fmt::Formatter, mut stack: Vec<Piece>) -> fmt::Result {
    while let Some(piece) = stack.pop() {
        match piece {
            Piece::Text(text) => f.write_str(text)?,
            Piece::Expr(Expr::Leaf(leaf)) => write!(f, "{leaf}")?,
            Piece::Expr(Expr::Sum(sum)) => {
                stack.push(Piece::Text(")"));
                stack.push(Piece::Expr(sum.rhs()));
                stack.push(Piece::Text(" + "));
                stack.push(Piece::Expr(sum.lhs()));
                f.write_str("(")?;
            }
        }
    }
    Ok(())
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("(")?;
        write_pieces(
            f,
            vec![
                Piece::Text(")"),
                Piece::Expr(self.rhs()),
                Piece::Text(" + "),
                Piece::Expr(self.lhs()),
            ],
        )
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_pieces(f, vec![Piece::Expr(self)])
    }
}

// Derived `Debug` would walk the whole tree recursively.
impl fmt::Debug for Sum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Sum").field(&format_args!("{self}")).finish()
    }
}
