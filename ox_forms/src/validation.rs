use crate::request::FormRequest;
use crate::schema::{Field, RuleMode, ValidationRule, RULE_REQUIRED, RULE_SOMETIMES_REQUIRED};
use serde_json::Value;

/// Represents a validation error for a specific field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Service for validating submitted input against field rule sets.
pub struct Validator;

impl Validator {
    pub fn validate(&self, fields: &[Field], request: &FormRequest, mode: RuleMode) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for field in fields {
            self.validate_field(field, request, mode, &mut errors);
        }
        errors
    }

    fn validate_field(&self, field: &Field, request: &FormRequest, mode: RuleMode, errors: &mut Vec<ValidationError>) {
        let value = request.input(field.attribute());

        for rule in field.effective_rules(mode) {
            if let Err(msg) = self.check_rule(&rule, value, field, request) {
                errors.push(ValidationError {
                    field: field.attribute().to_string(),
                    message: msg,
                });
            }
        }
    }

    fn check_rule(&self, rule: &ValidationRule, value: Option<&Value>, field: &Field, request: &FormRequest) -> Result<(), String> {
        let message = |default: String| rule.message.clone().unwrap_or(default);

        match rule.rule_type.as_str() {
            RULE_REQUIRED => {
                if is_blank(value) {
                    return Err(message(format!("{} is required", field.name())));
                }
            }
            RULE_SOMETIMES_REQUIRED => {
                let attribute = rule.parameters.get("attribute").and_then(Value::as_str).ok_or("Invalid sometimes_required parameters")?;
                let selected = rule.parameters.get("value").and_then(Value::as_str).ok_or("Invalid sometimes_required parameters")?;
                if request.input_str(attribute).as_deref() == Some(selected) && is_blank(value) {
                    return Err(message(format!("{} is required", field.name())));
                }
            }
            "min" => {
                let min_val = rule.parameters.as_f64().ok_or("Invalid min parameter")?;
                if let Some(val) = numeric(value)? {
                    if val < min_val {
                        return Err(message(format!("{} must be at least {}", field.name(), min_val)));
                    }
                }
            }
            "max" => {
                let max_val = rule.parameters.as_f64().ok_or("Invalid max parameter")?;
                if let Some(val) = numeric(value)? {
                    if val > max_val {
                        return Err(message(format!("{} must be at most {}", field.name(), max_val)));
                    }
                }
            }
            "regex" => {
                let pattern = rule.parameters.as_str().ok_or("Invalid regex parameter")?;
                if let Some(Value::String(s)) = value.filter(|v| !is_blank(Some(*v))) {
                    let re = regex::Regex::new(pattern).map_err(|_| "Invalid regex pattern")?;
                    if !re.is_match(s) {
                        return Err(message(format!("{} has invalid format", field.name())));
                    }
                }
            }
            other => {
                log::debug!("Skipping unknown rule '{}' on '{}'", other, field.attribute());
            }
        }
        Ok(())
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

fn numeric(value: Option<&Value>) -> Result<Option<f64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| "Not a number".to_string()),
        Some(_) => Err("Not a number".to_string()),
    }
}
