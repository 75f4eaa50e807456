use std::collections::HashMap;

/// The runtime mapping from variable name to current value. One environment
/// exists per program run; names are created on first assignment.
///
/// A lookup miss is surfaced as `None` and treated as an error by the
/// evaluator; variables never default to zero.
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, f64>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment {
            variables: HashMap::new(),
        }
    }

    pub fn put(&mut self, name: &str, value: f64) {
        self.variables.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrites() {
        let mut environment = Environment::new();

        assert_eq!(None, environment.get("x"));

        environment.put("x", 1.0);
        assert_eq!(Some(1.0), environment.get("x"));

        environment.put("x", 2.5);
        assert_eq!(Some(2.5), environment.get("x"));
    }
}
