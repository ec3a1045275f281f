//! Query model of the record API: field projection, `where` conditions,
//! OR-able condition groups, ordering and paging.
//!
//! `where` conditions AND together and the values inside one condition OR
//! together. A group with [`GroupOperator::Or`] matches when any of its
//! sub-groups matches, and the conditions inside a sub-group AND together.

use serde_json::{json, Value};
use std::cmp::Ordering;

/// Comparison applied by a single condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    EqualTo,
    ExactMatch,
    Contains,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::EqualTo => "EqualTo",
            Operator::ExactMatch => "ExactMatch",
            Operator::Contains => "Contains",
            Operator::GreaterThanOrEqualTo => "GreaterThanOrEqualTo",
            Operator::LessThanOrEqualTo => "LessThanOrEqualTo",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Condition {
    pub fn new(field: &str, operator: Operator, values: Vec<String>) -> Self {
        Self {
            field: field.to_string(),
            operator,
            values,
        }
    }

    pub fn equal_to(field: &str, value: impl ToString) -> Self {
        Self::new(field, Operator::EqualTo, vec![value.to_string()])
    }

    pub fn exact_match<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self::new(
            field,
            Operator::ExactMatch,
            values.into_iter().map(|v| v.to_string()).collect(),
        )
    }

    pub fn contains(field: &str, value: impl ToString) -> Self {
        Self::new(field, Operator::Contains, vec![value.to_string()])
    }

    pub fn at_least(field: &str, value: impl ToString) -> Self {
        Self::new(field, Operator::GreaterThanOrEqualTo, vec![value.to_string()])
    }

    pub fn at_most(field: &str, value: impl ToString) -> Self {
        Self::new(field, Operator::LessThanOrEqualTo, vec![value.to_string()])
    }

    /// Evaluate the condition against a record
    pub fn matches(&self, record: &Value) -> bool {
        let Some(actual) = record.get(&self.field).filter(|v| !v.is_null()) else {
            return false;
        };

        match self.operator {
            Operator::Contains => {
                let needles: Vec<String> = self.values.iter().map(|v| v.to_lowercase()).collect();
                scalars(actual).any(|text| {
                    let text = text.to_lowercase();
                    needles.iter().any(|needle| text.contains(needle))
                })
            }
            Operator::EqualTo => elements(actual)
                .any(|item| self.values.iter().any(|wanted| equal_scalar(item, wanted))),
            Operator::ExactMatch => elements(actual)
                .any(|item| self.values.iter().any(|wanted| exact_scalar(item, wanted))),
            Operator::GreaterThanOrEqualTo => self.compare_numeric(actual, |a, b| a >= b),
            Operator::LessThanOrEqualTo => self.compare_numeric(actual, |a, b| a <= b),
        }
    }

    fn compare_numeric(&self, actual: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
        let Some(actual) = as_number(actual) else {
            return false;
        };
        self.values
            .iter()
            .filter_map(|v| v.trim().parse::<f64>().ok())
            .any(|bound| cmp(actual, bound))
    }

    fn to_wire(&self, capitalized: bool) -> Value {
        if capitalized {
            json!({
                "FieldName": self.field,
                "Operator": self.operator.as_str(),
                "Values": self.values,
            })
        } else {
            json!({
                "fieldName": self.field,
                "operator": self.operator.as_str(),
                "values": self.values,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOperator {
    And,
    Or,
}

/// A set of condition sub-groups joined by one operator
#[derive(Debug, Clone, PartialEq)]
pub struct WhereGroup {
    pub operator: GroupOperator,
    pub sub_groups: Vec<Vec<Condition>>,
}

impl WhereGroup {
    /// One single-condition sub-group per condition, OR-ed together
    pub fn any_of(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            operator: GroupOperator::Or,
            sub_groups: conditions.into_iter().map(|c| vec![c]).collect(),
        }
    }

    pub fn matches(&self, record: &Value) -> bool {
        let sub_group_matches =
            |conditions: &Vec<Condition>| conditions.iter().all(|c| c.matches(record));
        match self.operator {
            GroupOperator::Or => self.sub_groups.iter().any(sub_group_matches),
            GroupOperator::And => self.sub_groups.iter().all(sub_group_matches),
        }
    }

    fn to_wire(&self) -> Value {
        let operator = match self.operator {
            GroupOperator::And => "AND",
            GroupOperator::Or => "OR",
        };
        let sub_groups: Vec<Value> = self
            .sub_groups
            .iter()
            .map(|conditions| {
                json!({
                    "conditions": conditions.iter().map(|c| c.to_wire(false)).collect::<Vec<_>>()
                })
            })
            .collect();
        json!({ "operator": operator, "subGroups": sub_groups })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub limit: usize,
    pub offset: usize,
}

/// A fetch request against one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub fields: Vec<String>,
    pub conditions: Vec<Condition>,
    pub groups: Vec<WhereGroup>,
    pub order_by: Vec<OrderBy>,
    pub paging: Option<Paging>,
}

impl Query {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn group(mut self, group: WhereGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_string(),
            direction: SortDirection::Desc,
        });
        self
    }

    pub fn order_by_asc(mut self, field: &str) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_string(),
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.paging = Some(Paging { limit, offset });
        self
    }

    /// True when the record satisfies every condition and every group
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
            && self.groups.iter().all(|g| g.matches(record))
    }

    /// Ordering of two records under this query's `orderBy` clauses
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.order_by
            .iter()
            .map(|order| {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            })
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    /// Keep `Id` plus the requested fields; an empty field list keeps everything
    pub fn project(&self, record: &Value) -> Value {
        let Some(object) = record.as_object() else {
            return record.clone();
        };
        if self.fields.is_empty() {
            return record.clone();
        }

        let projected = object
            .iter()
            .filter(|(key, _)| key.as_str() == "Id" || self.fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Value::Object(projected)
    }

    /// Request body understood by the remote record API
    pub fn to_wire(&self) -> Value {
        let mut body = serde_json::Map::new();
        body.insert(
            "fields".into(),
            Value::Array(
                self.fields
                    .iter()
                    .map(|name| json!({ "field": { "Name": name } }))
                    .collect(),
            ),
        );
        if !self.conditions.is_empty() {
            body.insert(
                "where".into(),
                Value::Array(self.conditions.iter().map(|c| c.to_wire(true)).collect()),
            );
        }
        if !self.groups.is_empty() {
            body.insert(
                "whereGroups".into(),
                Value::Array(self.groups.iter().map(WhereGroup::to_wire).collect()),
            );
        }
        if !self.order_by.is_empty() {
            body.insert(
                "orderBy".into(),
                Value::Array(
                    self.order_by
                        .iter()
                        .map(|order| {
                            let sort = match order.direction {
                                SortDirection::Asc => "ASC",
                                SortDirection::Desc => "DESC",
                            };
                            json!({ "fieldName": order.field, "sorttype": sort })
                        })
                        .collect(),
                ),
            );
        }
        if let Some(paging) = self.paging {
            body.insert(
                "pagingInfo".into(),
                json!({ "limit": paging.limit, "offset": paging.offset }),
            );
        }
        Value::Object(body)
    }
}

/// A value itself, or its elements when it is an array
fn elements(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Array(items) => Box::new(items.iter()),
        other => Box::new(std::iter::once(other)),
    }
}

/// Scalar text forms of a value; arrays yield their elements
fn scalars(value: &Value) -> impl Iterator<Item = String> + '_ {
    elements(value).filter_map(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Exact text equality. Stored numbers also equal a finite numeric literal,
/// so `4.0` matches `"4"`; stored text is never parsed.
fn equal_scalar(actual: &Value, wanted: &str) -> bool {
    match actual {
        Value::Number(n) => match (n.as_f64(), finite_number(wanted)) {
            (Some(a), Some(b)) => a == b,
            _ => n.to_string() == wanted,
        },
        Value::String(s) => s == wanted,
        Value::Bool(b) => b.to_string() == wanted,
        _ => false,
    }
}

/// Like [`equal_scalar`], ignoring ASCII case and surrounding whitespace on text
fn exact_scalar(actual: &Value, wanted: &str) -> bool {
    match actual {
        Value::String(s) => s.trim().eq_ignore_ascii_case(wanted.trim()),
        Value::Bool(b) => b.to_string().eq_ignore_ascii_case(wanted.trim()),
        other => equal_scalar(other, wanted),
    }
}

fn finite_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numbers compare numerically, everything else by text. Missing sorts first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => scalar_text(a).cmp(&scalar_text(b)),
        },
    }
}
