//! Instruction model.
//!
//! An [`Instruction`] is a tagged variant over the four record shapes the
//! wire JSON allows. Parsing dispatches on which keys are present, exactly
//! as `original_source/src/bril.py`'s `Function._parse_instr` does; the
//! Python version's duck-typed field checks become exhaustive match arms
//! here.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::IrError;
use crate::ir::types::{Operator, ValueType};

/// A constant literal value, constrained by [`ValueType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl Literal {
    fn matches(&self, ty: ValueType) -> bool {
        matches!(
            (self, ty),
            (Literal::Int(_), ValueType::Int) | (Literal::Bool(_), ValueType::Bool)
        )
    }
}

/// One instruction in a function body.
///
/// `Label` is excluded from a [`crate::cfg::BasicBlock`]'s own instruction
/// list (it names the block instead) but is a first-class variant here
/// because it appears in the flat, pre-CFG instruction stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Const {
        dest: String,
        ty: ValueType,
        value: Literal,
    },
    ValueOp {
        op: Operator,
        dest: String,
        ty: ValueType,
        args: Vec<String>,
        funcs: Vec<String>,
        labels: Vec<String>,
    },
    EffectOp {
        op: Operator,
        args: Vec<String>,
        funcs: Vec<String>,
        labels: Vec<String>,
    },
    Label { label: String },
}

impl Instruction {
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label { .. })
    }

    pub fn is_phi(&self) -> bool {
        matches!(self, Instruction::ValueOp { op: Operator::Phi, .. })
    }

    /// `true` for a `ValueOp`/`EffectOp` whose operator ends a block.
    pub fn is_terminator(&self) -> bool {
        match self {
            Instruction::EffectOp { op, .. } => op.is_block_terminator(),
            _ => false,
        }
    }

    /// The destination name, for `Const`/`ValueOp`.
    pub fn dest(&self) -> Option<&str> {
        match self {
            Instruction::Const { dest, .. } => Some(dest),
            Instruction::ValueOp { dest, .. } => Some(dest),
            _ => None,
        }
    }

    pub fn dest_mut(&mut self) -> Option<&mut String> {
        match self {
            Instruction::Const { dest, .. } => Some(dest),
            Instruction::ValueOp { dest, .. } => Some(dest),
            _ => None,
        }
    }

    pub fn declared_type(&self) -> Option<ValueType> {
        match self {
            Instruction::Const { ty, .. } => Some(*ty),
            Instruction::ValueOp { ty, .. } => Some(*ty),
            _ => None,
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            Instruction::ValueOp { args, .. } => args,
            Instruction::EffectOp { args, .. } => args,
            _ => &[],
        }
    }

    pub fn args_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Instruction::ValueOp { args, .. } => Some(args),
            Instruction::EffectOp { args, .. } => Some(args),
            _ => None,
        }
    }

    pub fn labels(&self) -> &[String] {
        match self {
            Instruction::ValueOp { labels, .. } => labels,
            Instruction::EffectOp { labels, .. } => labels,
            _ => &[],
        }
    }

    /// Parse a raw IR record. Dispatch order: a `label` key always wins,
    /// then `op == "const"`, then presence of `dest`, else it is an effect.
    pub fn from_raw(raw: &Map<String, Value>) -> Result<Instruction, IrError> {
        if let Some(label) = raw.get("label") {
            let label = label.as_str().ok_or(IrError::WrongFieldType {
                field: "label",
                expected: "string",
            })?;
            return Ok(Instruction::Label {
                label: label.to_string(),
            });
        }

        let op_str = raw
            .get("op")
            .and_then(Value::as_str)
            .ok_or(IrError::MissingField { field: "op" })?;
        let op = Operator::from_str(op_str).ok_or_else(|| IrError::UnknownOperator {
            op: op_str.to_string(),
        })?;

        if op == Operator::Const {
            let dest = string_field(raw, "dest")?;
            let ty = type_field(raw)?;
            let value = raw.get("value").ok_or(IrError::MissingField { field: "value" })?;
            let value = parse_literal(value, ty)?;
            return Ok(Instruction::Const { dest, ty, value });
        }

        let args = string_list_field(raw, "args")?;
        let funcs = string_list_field(raw, "funcs")?;
        let labels = string_list_field(raw, "labels")?;

        if let Some(dest) = raw.get("dest") {
            let dest = dest
                .as_str()
                .ok_or(IrError::WrongFieldType {
                    field: "dest",
                    expected: "string",
                })?
                .to_string();
            let ty = type_field(raw)?;
            Ok(Instruction::ValueOp {
                op,
                dest,
                ty,
                args,
                funcs,
                labels,
            })
        } else {
            if !op.has_side_effect() {
                return Err(IrError::NotAnEffect { op: op.as_str() });
            }
            Ok(Instruction::EffectOp {
                op,
                args,
                funcs,
                labels,
            })
        }
    }

    /// Re-emit as a raw record with stable field order (`op`, `dest`,
    /// `type`, `args`, `funcs`, `labels`, `value`, `label`), omitting
    /// absent optional fields.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut m = Map::new();
        match self {
            Instruction::Label { label } => {
                m.insert("label".to_string(), Value::String(label.clone()));
            }
            Instruction::Const { dest, ty, value } => {
                m.insert("op".to_string(), Value::String("const".to_string()));
                m.insert("dest".to_string(), Value::String(dest.clone()));
                m.insert("type".to_string(), Value::String(ty.as_str().to_string()));
                m.insert("value".to_string(), literal_to_value(value));
            }
            Instruction::ValueOp {
                op,
                dest,
                ty,
                args,
                funcs,
                labels,
            } => {
                m.insert("op".to_string(), Value::String(op.as_str().to_string()));
                m.insert("dest".to_string(), Value::String(dest.clone()));
                m.insert("type".to_string(), Value::String(ty.as_str().to_string()));
                insert_if_nonempty(&mut m, "args", args);
                insert_if_nonempty(&mut m, "funcs", funcs);
                insert_if_nonempty(&mut m, "labels", labels);
            }
            Instruction::EffectOp {
                op,
                args,
                funcs,
                labels,
            } => {
                m.insert("op".to_string(), Value::String(op.as_str().to_string()));
                insert_if_nonempty(&mut m, "args", args);
                insert_if_nonempty(&mut m, "funcs", funcs);
                insert_if_nonempty(&mut m, "labels", labels);
            }
        }
        m
    }
}

fn insert_if_nonempty(m: &mut Map<String, Value>, key: &str, values: &[String]) {
    if !values.is_empty() {
        m.insert(
            key.to_string(),
            Value::Array(values.iter().cloned().map(Value::String).collect()),
        );
    }
}

fn string_field(raw: &Map<String, Value>, field: &'static str) -> Result<String, IrError> {
    raw.get(field)
        .ok_or(IrError::MissingField { field })?
        .as_str()
        .map(str::to_string)
        .ok_or(IrError::WrongFieldType {
            field,
            expected: "string",
        })
}

fn type_field(raw: &Map<String, Value>) -> Result<ValueType, IrError> {
    let ty_str = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or(IrError::MissingField { field: "type" })?;
    ValueType::from_str(ty_str).ok_or_else(|| IrError::UnknownType {
        ty: ty_str.to_string(),
    })
}

fn string_list_field(raw: &Map<String, Value>, field: &'static str) -> Result<Vec<String>, IrError> {
    match raw.get(field) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or(IrError::WrongFieldType {
                    field,
                    expected: "list of strings",
                })
            })
            .collect(),
        Some(_) => Err(IrError::WrongFieldType {
            field,
            expected: "list",
        }),
    }
}

fn parse_literal(value: &Value, ty: ValueType) -> Result<Literal, IrError> {
    let literal = match value {
        Value::Bool(b) => Literal::Bool(*b),
        Value::Number(n) if n.is_i64() => Literal::Int(n.as_i64().unwrap()),
        _ => {
            return Err(IrError::WrongFieldType {
                field: "value",
                expected: "int or bool",
            })
        }
    };
    if !literal.matches(ty) {
        return Err(IrError::LiteralTypeMismatch {
            value: literal.to_string(),
            ty: ty.as_str(),
        });
    }
    Ok(literal)
}

fn literal_to_value(literal: &Literal) -> Value {
    match literal {
        Literal::Int(v) => Value::from(*v),
        Literal::Bool(v) => Value::from(*v),
    }
}

impl Serialize for Instruction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Instruction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        Instruction::from_raw(&raw).map_err(serde::de::Error::custom)
    }
}
