//! Hierarchical matrix stack.
//!
//! A [`TransformStack`] always holds at least its base identity matrix. The
//! top entry is the active transform; composition operations right-multiply
//! it in place, so `stack.translate(t).scale(s)` leaves `T * S` on top and
//! scale is applied to the geometry first.
//!
//! ```ignore
//! let mut mv = TransformStack::new();
//! mv.push();
//! mv.translate(Vec3::new(0.5, 0.0, 0.0)).scale_uniform(0.5);
//! upload(mv.top());
//! mv.pop()?;
//! ```

use crate::error::StackError;
use crate::math::{Mat4, Vec3};

#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    /// Creates a stack holding only the base identity matrix.
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::identity()],
        }
    }

    /// Number of entries, including the base.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the active matrix.
    pub fn top(&self) -> &Mat4 {
        // Non-empty: `pop` refuses to remove the base entry.
        &self.stack[self.stack.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Duplicates the top matrix.
    pub fn push(&mut self) -> &mut Self {
        let top = *self.top();
        self.stack.push(top);
        self
    }

    /// Removes and returns the top matrix.
    pub fn pop(&mut self) -> Result<Mat4, StackError> {
        if self.stack.len() <= 1 {
            return Err(StackError::Underflow);
        }
        self.stack.pop().ok_or(StackError::Underflow)
    }

    /// Replaces the top matrix with identity.
    pub fn load_identity(&mut self) -> &mut Self {
        *self.top_mut() = Mat4::identity();
        self
    }

    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        self.multiply(&Mat4::translation(offset))
    }

    pub fn scale(&mut self, factors: Vec3) -> &mut Self {
        self.multiply(&Mat4::scaling(factors))
    }

    pub fn scale_uniform(&mut self, factor: f32) -> &mut Self {
        self.scale(Vec3::splat(factor))
    }

    /// Rotates by `angle` radians about `axis`.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) -> &mut Self {
        self.multiply(&Mat4::rotation(angle, axis))
    }

    /// Right-multiplies the top matrix: `top = top * m`.
    pub fn multiply(&mut self, m: &Mat4) -> &mut Self {
        let top = self.top_mut();
        *top = *top * *m;
        self
    }

    /// Pushes, runs `f`, then pops, so the scope is always balanced.
    ///
    /// Fails with [`StackError::Underflow`] if `f` popped more than it pushed
    /// and with [`StackError::Unbalanced`] if it left extra entries behind.
    /// Extra entries are discarded before returning, so the stack is back at
    /// its entry depth either way.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> Result<R, StackError> {
        let depth = self.depth();
        self.push();
        let result = f(self);
        let found = self.depth();
        if found <= depth {
            return Err(StackError::Underflow);
        }
        self.stack.truncate(depth);
        if found != depth + 1 {
            return Err(StackError::Unbalanced {
                expected: depth + 1,
                found,
            });
        }
        Ok(result)
    }

    /// Checks that only the base entry remains.
    pub fn ensure_base(&self) -> Result<(), StackError> {
        match self.depth() {
            1 => Ok(()),
            found => Err(StackError::Unbalanced { expected: 1, found }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn starts_with_identity_base() {
        let stack = TransformStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Mat4::identity());
    }

    #[test]
    fn push_duplicates_top() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(1.0, 2.0, 3.0));
        let before = *stack.top();
        stack.push();
        assert_eq!(stack.depth(), 2);
        assert_eq!(*stack.top(), before);
    }

    #[test]
    fn pop_restores_previous_top() {
        let mut stack = TransformStack::new();
        stack.push().scale_uniform(3.0);
        stack.pop().unwrap();
        assert_eq!(*stack.top(), Mat4::identity());
    }

    #[test]
    fn pop_at_base_underflows() {
        let mut stack = TransformStack::new();
        assert_eq!(stack.pop(), Err(StackError::Underflow));

        stack.push();
        stack.pop().unwrap();
        assert_eq!(stack.pop(), Err(StackError::Underflow));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn balanced_sequences_preserve_depth() {
        let mut stack = TransformStack::new();
        stack.push();
        let start = stack.depth();

        for i in 0..16 {
            let f = i as f32;
            stack.push();
            stack.translate(Vec3::new(f, -f, 0.5));
            stack.push();
            stack.rotate(f * 0.1, Vec3::new(1.0, f, 0.0));
            stack.scale(Vec3::new(1.0 + f, 2.0, 0.5));
            stack.pop().unwrap();
            stack.scale_uniform(0.5);
            stack.pop().unwrap();
            assert_eq!(stack.depth(), start);
        }
    }

    #[test]
    fn composition_matches_manual_product() {
        let t = Vec3::new(-0.5, -0.5, 0.0);
        let s = Vec3::new(0.5, 0.25, 2.0);
        let axis = Vec3::new(0.3, 1.0, 0.2);
        let theta = 1.1;

        let mut stack = TransformStack::new();
        stack.translate(t).scale(s).rotate(theta, axis);

        let expected = Mat4::translation(t) * Mat4::scaling(s) * Mat4::rotation(theta, axis);
        assert_relative_eq!(*stack.top(), expected, epsilon = 1e-6);
    }

    #[test]
    fn last_applied_operation_affects_object_first() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(1.0, 0.0, 0.0)).scale_uniform(2.0);
        // Scale first (1 -> 2), then translate (2 -> 3).
        let p = *stack.top() * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn multiply_right_multiplies() {
        let mut shear = Mat4::identity();
        shear.set(1, 0, 0.5);
        let mut stack = TransformStack::new();
        stack.rotate(PI, Vec3::Y).multiply(&shear);
        let expected = Mat4::rotation(PI, Vec3::Y) * shear;
        assert_relative_eq!(*stack.top(), expected, epsilon = 1e-6);
    }

    #[test]
    fn load_identity_only_touches_top() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::X);
        stack.push().scale_uniform(4.0).load_identity();
        assert_eq!(*stack.top(), Mat4::identity());
        stack.pop().unwrap();
        assert_eq!(*stack.top(), Mat4::translation(Vec3::X));
    }

    #[test]
    fn scoped_is_balanced() {
        let mut stack = TransformStack::new();
        let inner = stack
            .scoped(|s| {
                s.translate(Vec3::new(0.0, 4.0, 0.0));
                *s.top()
            })
            .unwrap();
        assert_eq!(inner, Mat4::translation(Vec3::new(0.0, 4.0, 0.0)));
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Mat4::identity());
    }

    #[test]
    fn scoped_detects_extra_pop() {
        let mut stack = TransformStack::new();
        stack.push();
        let result = stack.scoped(|s| {
            s.pop().unwrap();
        });
        assert_eq!(result, Err(StackError::Underflow));
    }

    #[test]
    fn scoped_detects_extra_push() {
        let mut stack = TransformStack::new();
        let result = stack.scoped(|s| {
            s.push();
            s.translate(Vec3::X);
        });
        assert_eq!(
            result,
            Err(StackError::Unbalanced {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.top(), Mat4::identity());
    }

    #[test]
    fn ensure_base_reports_leftover_entries() {
        let mut stack = TransformStack::new();
        assert_eq!(stack.ensure_base(), Ok(()));
        stack.push().push();
        assert_eq!(
            stack.ensure_base(),
            Err(StackError::Unbalanced {
                expected: 1,
                found: 3
            })
        );
    }
}
