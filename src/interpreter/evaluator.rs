use std::fmt::{Display, Formatter};
use std::io::Write;
use crate::interpreter::ast::{BinaryOp, Expr, Stmt};
use crate::interpreter::environment::Environment;

#[derive(Debug)]
pub enum RuntimeError {
    UndefinedVariable(String),
    Io(std::io::Error),
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::UndefinedVariable(name) => write!(f, "Undefined variable '{}'", name),
            RuntimeError::Io(err) => write!(f, "Failed to write command: {}", err),
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> RuntimeError {
        RuntimeError::Io(err)
    }
}

type RuntimeResult<T> = Result<T, RuntimeError>;

fn boolean(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Tree-walking executor. Walks the statement tree in program order against
/// one flat variable environment and writes one command line per effectful
/// action to the output sink.
pub struct Interpreter {
    environment: Environment,
    legacy_turns: bool,
}

impl Interpreter {
    /// With `legacy_turns`, `LEFT` emits the negated angle just like
    /// `RIGHT`, making the two directions indistinguishable in the command
    /// stream. The historical implementation behaved this way.
    pub fn new(legacy_turns: bool) -> Interpreter {
        Interpreter {
            environment: Environment::new(),
            legacy_turns,
        }
    }

    pub fn interpret(&mut self, statements: &[Stmt], out: &mut impl Write) -> RuntimeResult<()> {
        for statement in statements {
            self.execute(statement, out)?;
        }

        Ok(())
    }

    fn execute(&mut self, statement: &Stmt, out: &mut impl Write) -> RuntimeResult<()> {
        match statement {
            Stmt::Home => writeln!(out, "H").map_err(RuntimeError::Io),
            Stmt::PenUp => writeln!(out, "U").map_err(RuntimeError::Io),
            Stmt::PenDown => writeln!(out, "D").map_err(RuntimeError::Io),
            Stmt::PushState => writeln!(out, "[").map_err(RuntimeError::Io),
            Stmt::PopState => writeln!(out, "]").map_err(RuntimeError::Io),

            Stmt::Forward(distance) => {
                let distance = self.evaluate(distance)?;
                writeln!(out, "M {}", distance)?;

                Ok(())
            },
            Stmt::Left(angle) => {
                let angle = self.evaluate(angle)?;
                // A rotation command carries a counter-clockwise angle;
                // a left turn is the positive direction.
                let angle = if self.legacy_turns { -angle } else { angle };
                writeln!(out, "R {}", angle)?;

                Ok(())
            },
            Stmt::Right(angle) => {
                let angle = self.evaluate(angle)?;
                writeln!(out, "R {}", -angle)?;

                Ok(())
            },

            Stmt::Assign { name, expr } => {
                let value = self.evaluate(expr)?;
                self.environment.put(name, value);

                Ok(())
            },
            Stmt::If { condition, then, otherwise } => {
                if self.evaluate(condition)? != 0.0 {
                    self.execute(then, out)
                } else if let Some(otherwise) = otherwise {
                    self.execute(otherwise, out)
                } else {
                    Ok(())
                }
            },
            Stmt::While { condition, body } => {
                while self.evaluate(condition)? != 0.0 {
                    self.execute(body, out)?;
                }

                Ok(())
            },
            Stmt::Block(statements) => {
                for statement in statements {
                    self.execute(statement, out)?;
                }

                Ok(())
            },
        }
    }

    fn evaluate(&self, expr: &Expr) -> RuntimeResult<f64> {
        match expr {
            Expr::Constant(value) => Ok(*value),
            Expr::Variable(name) => self.environment.get(name)
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),

            Expr::Negate(expr) => Ok(-self.evaluate(expr)?),
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                Ok(match operator {
                    BinaryOp::Add => left + right,
                    BinaryOp::Subtract => left - right,
                    BinaryOp::Multiply => left * right,
                    // Division by zero follows floating-point semantics
                    BinaryOp::Divide => left / right,

                    BinaryOp::Or => boolean(left != 0.0 || right != 0.0),
                    BinaryOp::And => boolean(left != 0.0 && right != 0.0),

                    BinaryOp::Equal => boolean(left == right),
                    BinaryOp::NotEqual => boolean(left != right),
                    BinaryOp::Less => boolean(left < right),
                    BinaryOp::LessEqual => boolean(left <= right),
                    BinaryOp::Greater => boolean(left > right),
                    BinaryOp::GreaterEqual => boolean(left >= right),
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::Lexer;
    use crate::interpreter::parser::Parser;

    fn evaluate(source: &str) -> RuntimeResult<f64> {
        // Wrap the expression in a FORWARD statement to reuse the parser
        let statements = Parser::new(Lexer::new(&format!("FORWARD {}", source)))
            .parse().expect("parse failed");

        match &statements[..] {
            [Stmt::Forward(expr)] => Interpreter::new(false).evaluate(expr),
            _ => panic!("expected a single FORWARD statement"),
        }
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(14.0, evaluate("2 + 3 * 4").unwrap());
        assert_eq!(20.0, evaluate("(2 + 3) * 4").unwrap());
        assert_eq!(1.0, evaluate("-2 + 3").unwrap());
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        assert_eq!(f64::INFINITY, evaluate("1 / 0").unwrap());
        assert_eq!(f64::NEG_INFINITY, evaluate("-1 / 0").unwrap());
        assert!(evaluate("0 / 0").unwrap().is_nan());
    }

    #[test]
    fn test_undefined_variable_fails() {
        assert!(matches!(evaluate("x + 1"), Err(RuntimeError::UndefinedVariable(name)) if name == "x"));
    }

    #[test]
    fn test_boolean_results_are_zero_or_one() {
        let condition = Expr::Binary {
            left: Box::new(Expr::Constant(2.0)),
            operator: BinaryOp::Less,
            right: Box::new(Expr::Constant(3.0)),
        };
        assert_eq!(1.0, Interpreter::new(false).evaluate(&condition).unwrap());

        let condition = Expr::Binary {
            left: Box::new(Expr::Constant(5.0)),
            operator: BinaryOp::Or,
            right: Box::new(Expr::Constant(0.0)),
        };
        assert_eq!(1.0, Interpreter::new(false).evaluate(&condition).unwrap());

        let condition = Expr::Binary {
            left: Box::new(Expr::Constant(5.0)),
            operator: BinaryOp::And,
            right: Box::new(Expr::Constant(0.0)),
        };
        assert_eq!(0.0, Interpreter::new(false).evaluate(&condition).unwrap());
    }

    #[test]
    fn test_assign_then_read() {
        let mut interpreter = Interpreter::new(false);
        let mut out = Vec::new();

        interpreter.execute(&Stmt::Assign {
            name: String::from("x"),
            expr: Expr::Constant(5.0),
        }, &mut out).unwrap();

        assert_eq!(Ok(5.0), interpreter.evaluate(&Expr::Variable(String::from("x"))).map_err(|err| err.to_string()));
        assert!(out.is_empty());
    }
}
