pub mod error;
pub mod output;

pub use output::*;

use error::{AppError, AppResult};
use std::collections::HashMap;
use std::io::{self, Write};

/// Plain y/N confirmation on stdin. Empty input means no.
pub fn prompt_yes_no(prompt: &str) -> AppResult<bool> {
    loop {
        print!("{} [y/N]: ", prompt);
        io::stdout()
            .flush()
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::Storage(e.to_string()))?;

        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => println!("Please enter 'y' or 'n'"),
        }
    }
}

/// Parses `key=value` pairs from the command line into a variable map.
pub fn parse_variables(var_args: &[String]) -> AppResult<HashMap<String, String>> {
    let mut vars = HashMap::new();
    for var in var_args {
        match var.find('=') {
            Some(pos) => {
                let key = var[..pos].trim().to_string();
                let value = var[pos + 1..].trim().to_string();
                if key.is_empty() {
                    return Err(AppError::InvalidArgument(format!(
                        "invalid variable '{}': empty name",
                        var
                    )));
                }
                vars.insert(key, value);
            },
            None => {
                return Err(AppError::InvalidArgument(format!(
                    "invalid variable format: {}. Expected key=value",
                    var
                )));
            },
        }
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_parse_key_value_pairs() {
        let vars = parse_variables(&["name=Ann".into(), "lang = Rust ".into()]).unwrap();
        assert_eq!(vars["name"], "Ann");
        assert_eq!(vars["lang"], "Rust");
    }

    #[test]
    fn value_may_contain_equals() {
        let vars = parse_variables(&["expr=a=b".into()]).unwrap();
        assert_eq!(vars["expr"], "a=b");
    }

    #[test]
    fn missing_equals_is_rejected() {
        let err = parse_variables(&["nope".into()]).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = parse_variables(&["=value".into()]).unwrap_err();
        assert_eq!(err.kind(), "invalid_argument");
    }
}
