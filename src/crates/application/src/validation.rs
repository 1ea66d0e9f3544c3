//! 请求校验
//!
//! 长度、范围等约束由 garde 声明在命令结构体上；这里只负责 garde 不处理的部分：
//! 类型检查（数字字段同时接受 JSON 数字和数字字符串，统一归一化为整数）、必填字段、未知字段。
//! 校验不会在第一个错误处停止：所有字段的错误按字段顺序收集，最终以 `. ` 拼接成一条消息。

use garde::Validate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Number, Value};
use std::fmt;

pub const MAX_STRING_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    details: Vec<String>,
}

impl ValidationError {
    fn new(details: Vec<String>) -> Self {
        Self { details }
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.details.join(". "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// 字符串，对应 `#[garde(length(chars, min = 1, max = 255))]`
    Text,
    /// 整数，对应 `#[garde(range(min = ..))]`
    Integer { min: i64 },
}

impl Kind {
    fn check_type(&self, label: &str, value: &Value) -> Result<Value, String> {
        match self {
            Kind::Text => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(format!("\"{}\" must be a string", label)),
            },
            Kind::Integer { .. } => to_integer(label, value).map(|n| Value::Number(Number::from(n))),
        }
    }

    /// garde 报告失败后给出的消息
    fn constraint_message(&self, label: &str, value: Option<&Value>) -> String {
        match self {
            Kind::Text => {
                if value.and_then(Value::as_str).map_or(true, str::is_empty) {
                    format!("\"{}\" is not allowed to be empty", label)
                } else {
                    format!(
                        "\"{}\" length must be less than or equal to {} characters long",
                        label, MAX_STRING_LEN
                    )
                }
            }
            Kind::Integer { min: 1 } => format!("\"{}\" must be a positive number", label),
            Kind::Integer { min } => {
                format!("\"{}\" must be greater than or equal to {}", label, min)
            }
        }
    }
}

fn to_integer(label: &str, value: &Value) -> Result<i64, String> {
    let not_a_number = || format!("\"{}\" must be a number", label);
    let float = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            n.as_f64().ok_or_else(not_a_number)?
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i);
            }
            match s.parse::<f64>() {
                Ok(f) if f.is_finite() => f,
                _ => return Err(not_a_number()),
            }
        }
        _ => return Err(not_a_number()),
    };

    if float.fract() != 0.0 {
        return Err(format!("\"{}\" must be an integer", label));
    }
    if float.abs() >= i64::MAX as f64 {
        return Err(format!("\"{}\" must be a safe number", label));
    }
    Ok(float as i64)
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// 请求对象的字段声明。目标结构体需要 `#[serde(default)]`，
/// 类型不对或缺失的字段以默认值参与 garde 校验，其 garde 错误会被忽略。
pub struct ObjectSchema {
    fields: &'static [Field],
}

impl ObjectSchema {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    pub fn validate_into<T>(&self, input: &Value) -> Result<T, ValidationError>
    where
        T: DeserializeOwned + Validate,
        T::Context: Default,
    {
        let Value::Object(object) = input else {
            return Err(ValidationError::new(vec![
                "\"value\" must be of type object".to_string(),
            ]));
        };

        let mut field_errors: Vec<Option<String>> = vec![None; self.fields.len()];
        let mut normalized = Map::new();

        for (idx, field) in self.fields.iter().enumerate() {
            match object.get(field.name) {
                Some(value) => match field.kind.check_type(field.name, value) {
                    Ok(value) => {
                        normalized.insert(field.name.to_string(), value);
                    }
                    Err(message) => field_errors[idx] = Some(message),
                },
                None if field.required => {
                    field_errors[idx] = Some(format!("\"{}\" is required", field.name));
                }
                None => {}
            }
        }

        let cmd: T = serde_json::from_value(Value::Object(normalized.clone()))
            .map_err(|e| ValidationError::new(vec![e.to_string()]))?;

        if let Err(report) = cmd.validate() {
            for (path, _) in report.iter() {
                let path = path.to_string();
                let Some(idx) = self.fields.iter().position(|f| f.name == path) else {
                    continue;
                };
                if field_errors[idx].is_none() {
                    let field = &self.fields[idx];
                    field_errors[idx] = Some(
                        field
                            .kind
                            .constraint_message(field.name, normalized.get(field.name)),
                    );
                }
            }
        }

        let mut details: Vec<String> = field_errors.into_iter().flatten().collect();
        for key in object.keys() {
            if !self.fields.iter().any(|f| f.name == key) {
                details.push(format!("\"{}\" is not allowed", key));
            }
        }

        if details.is_empty() {
            Ok(cmd)
        } else {
            Err(ValidationError::new(details))
        }
    }
}

const NAME: Kind = Kind::Text;
const ALBUM_COUNT: Kind = Kind::Integer { min: 1 };

pub const LIST_PAGING: ObjectSchema = ObjectSchema::new(&[
    Field::required("page", Kind::Integer { min: 0 }),
    Field::required("limit", Kind::Integer { min: 1 }),
]);

pub const CREATE_ARTIST: ObjectSchema = ObjectSchema::new(&[
    Field::required("username", NAME),
    Field::optional("artist_name", NAME),
    Field::optional("artist_genre", NAME),
    Field::optional("album_recorded", ALBUM_COUNT),
]);

pub const UPDATE_ARTIST: ObjectSchema = ObjectSchema::new(&[
    Field::required("username", NAME),
    Field::required("artist_name", NAME),
    Field::required("artist_genre", NAME),
    Field::required("album_recorded", ALBUM_COUNT),
]);

const USERNAME: ObjectSchema = ObjectSchema::new(&[Field::required("value", NAME)]);

/// Get / Remove 的路径参数
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
struct UsernameParam {
    #[garde(length(chars, min = 1, max = 255))]
    value: String,
}

/// Get / Remove 使用的单值校验
pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    USERNAME
        .validate_into::<UsernameParam>(&json!({ "value": username }))
        .map(|param| param.value)
}
