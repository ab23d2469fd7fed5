//! Arithmetic on coerced operands.

use crate::values::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArithOp {
    Add,
    Mul,
}

/// Evaluate a binary arithmetic operation.
///
/// Two integers use wrapping arithmetic to prevent panics on overflow. A
/// float on either side promotes both operands and follows IEEE 754.
pub(crate) fn eval_binary(op: ArithOp, left: Number, right: Number) -> Number {
    match (left, right) {
        (Number::Int(left), Number::Int(right)) => Number::Int(eval_binary_int(op, left, right)),
        (left, right) => Number::Float(eval_binary_float(op, left.as_f64(), right.as_f64())),
    }
}

fn eval_binary_int(op: ArithOp, left: i64, right: i64) -> i64 {
    match op {
        ArithOp::Add => left.wrapping_add(right),
        ArithOp::Mul => left.wrapping_mul(right),
    }
}

fn eval_binary_float(op: ArithOp, left: f64, right: f64) -> f64 {
    match op {
        ArithOp::Add => left + right,
        ArithOp::Mul => left * right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_add() {
        assert_eq!(
            eval_binary(ArithOp::Add, Number::Int(2), Number::Int(3)),
            Number::Int(5)
        );
        assert_eq!(
            eval_binary(ArithOp::Add, Number::Int(-5), Number::Int(3)),
            Number::Int(-2)
        );
    }

    #[test]
    fn test_int_mul() {
        assert_eq!(
            eval_binary(ArithOp::Mul, Number::Int(-2), Number::Int(5)),
            Number::Int(-10)
        );
    }

    #[test]
    fn test_int_wrapping_overflow() {
        // Test that we wrap on overflow rather than panic
        assert_eq!(
            eval_binary(ArithOp::Add, Number::Int(i64::MAX), Number::Int(1)),
            Number::Int(i64::MIN)
        );
        assert_eq!(
            eval_binary(ArithOp::Mul, Number::Int(i64::MAX), Number::Int(2)),
            Number::Int(-2)
        );
    }

    #[test]
    fn test_mixed_promotes_to_float() {
        assert_eq!(
            eval_binary(ArithOp::Add, Number::Int(1), Number::Float(0.5)),
            Number::Float(1.5)
        );
        assert_eq!(
            eval_binary(ArithOp::Mul, Number::Float(2.5), Number::Int(2)),
            Number::Float(5.0)
        );
    }

    #[test]
    fn test_float_overflow_is_infinite() {
        let result = eval_binary(ArithOp::Mul, Number::Float(f64::MAX), Number::Float(2.0));
        assert!(matches!(result, Number::Float(value) if value.is_infinite()));
    }
}
