use super::engine::type_mismatch;
use crate::ast::Value;
use crate::error::EvaluationError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dispatches a namespaced function call. Arity was checked at compile time.
pub(super) fn call(name: &str, args: Vec<Value>) -> Result<Value, EvaluationError> {
    let (namespace, function) = name.split_once('.').unwrap_or(("", name));
    match namespace {
        "Math" => math(name, function, &args),
        "Date" => date(name, function, &args),
        "String" => string(name, function, &args),
        _ => Err(unknown(name)),
    }
}

fn math(name: &str, function: &str, args: &[Value]) -> Result<Value, EvaluationError> {
    let n = number(name, args, 0)?;
    let result = match function {
        "min" => n.min(number(name, args, 1)?),
        "max" => n.max(number(name, args, 1)?),
        "pow" => n.powf(number(name, args, 1)?),
        "abs" => n.abs(),
        "round" => n.round(),
        "floor" => n.floor(),
        "ceil" => n.ceil(),
        "sqrt" if n < 0.0 => {
            return Err(EvaluationError::InvalidArgument {
                function: name.to_string(),
                message: format!("square root of negative number {}", n),
            });
        }
        "sqrt" => n.sqrt(),
        _ => return Err(unknown(name)),
    };
    Ok(Value::Number(result))
}

fn date(name: &str, function: &str, args: &[Value]) -> Result<Value, EvaluationError> {
    let day = parse_date(name, args, 0)?;
    let result = match function {
        "year" => f64::from(day.year()),
        "month" => f64::from(day.month()),
        "day" => f64::from(day.day()),
        "quarter" => f64::from((day.month() - 1) / 3 + 1),
        "daysBetween" => {
            let other = parse_date(name, args, 1)?;
            (other - day).num_days() as f64
        }
        "addDays" => {
            let days = number(name, args, 1)?;
            let shifted = TimeDelta::try_days(days.trunc() as i64)
                .and_then(|delta| day.checked_add_signed(delta))
                .ok_or_else(|| EvaluationError::InvalidArgument {
                    function: name.to_string(),
                    message: format!("date out of range after adding {} days", days),
                })?;
            return Ok(Value::Str(shifted.format(DATE_FORMAT).to_string()));
        }
        _ => return Err(unknown(name)),
    };
    Ok(Value::Number(result))
}

fn string(name: &str, function: &str, args: &[Value]) -> Result<Value, EvaluationError> {
    if function == "concat" {
        let joined = args.iter().map(plain_text).collect::<Result<String, _>>()?;
        return Ok(Value::Str(joined));
    }
    let s = text(name, args, 0)?;
    Ok(match function {
        "length" => Value::Number(s.chars().count() as f64),
        "upper" => Value::Str(s.to_uppercase()),
        "lower" => Value::Str(s.to_lowercase()),
        "contains" => Value::Bool(s.contains(text(name, args, 1)?)),
        "startsWith" => Value::Bool(s.starts_with(text(name, args, 1)?)),
        _ => return Err(unknown(name)),
    })
}

fn number(name: &str, args: &[Value], index: usize) -> Result<f64, EvaluationError> {
    match argument(name, args, index)? {
        Value::Number(n) => Ok(*n),
        other => Err(type_mismatch(name, "Number", other.clone())),
    }
}

fn text<'v>(name: &str, args: &'v [Value], index: usize) -> Result<&'v str, EvaluationError> {
    match argument(name, args, index)? {
        Value::Str(s) => Ok(s),
        other => Err(type_mismatch(name, "String", other.clone())),
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
fn parse_date(name: &str, args: &[Value], index: usize) -> Result<NaiveDate, EvaluationError> {
    let raw = text(name, args, index)?.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .ok_or_else(|| EvaluationError::InvalidArgument {
            function: name.to_string(),
            message: format!("'{}' is not a date", raw),
        })
}

fn plain_text(value: &Value) -> Result<String, EvaluationError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        Value::Number(_) | Value::Bool(_) | Value::Null => Ok(value.to_string()),
        other => Err(type_mismatch("String.concat", "scalar", other.clone())),
    }
}

fn argument<'v>(name: &str, args: &'v [Value], index: usize) -> Result<&'v Value, EvaluationError> {
    args.get(index).ok_or_else(|| EvaluationError::InvalidArgument {
        function: name.to_string(),
        message: format!("missing argument {}", index + 1),
    })
}

fn unknown(name: &str) -> EvaluationError {
    EvaluationError::InvalidArgument {
        function: name.to_string(),
        message: "unknown function".to_string(),
    }
}

