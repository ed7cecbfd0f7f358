//! Prometheus Metric Model and Text Encoder
//!
//! Collectors build immutable [`MetricFamily`] values; [`encode`] turns an
//! ordered slice of them into one text exposition document (format 0.0.4).
//!
//! # Output Rules
//!
//! - Every family emits exactly one `# HELP` and one `# TYPE <name> gauge` line,
//!   even with zero samples, so the schema is stable across scrapes.
//! - Samples keep their emission order; labels keep insertion order.
//! - Label values escape `\`, `"` and newline.
//! - Values print in shortest form (`25`, `0.5`) unless the family fixes a
//!   number of decimals, as `truenas_pool_free_percent` does (`25.00`).
//! - The document always ends with a newline.
//!
//! All metrics use the `truenas_` namespace prefix.

use std::fmt::Write as _;

pub const NAMESPACE: &str = "truenas";

/// Ordered label set. Keys are unique: setting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels(Vec<(String, String)>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value.to_string());
        self
    }

    /// Adds a label whose value may be absent; `None` renders as `""`.
    pub fn with_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        self.with(key, value)
    }

    pub fn insert(&mut self, key: &str, value: String) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub labels: Labels,
    pub value: f64,
}

/// A named group of gauge samples sharing one HELP/TYPE declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub samples: Vec<MetricSample>,
    /// Fixed number of decimals for finite values, shortest form when `None`.
    pub decimals: Option<usize>,
}

impl MetricFamily {
    /// Creates an empty gauge family named `truenas_<name>`.
    pub fn gauge(name: &str, help: &str) -> Self {
        Self {
            name: format!("{}_{}", NAMESPACE, name),
            help: help.to_string(),
            samples: Vec::new(),
            decimals: None,
        }
    }

    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }

    fn render_value(&self, v: f64) -> String {
        match self.decimals {
            Some(decimals) if v.is_finite() => format!("{:.*}", decimals, v),
            _ => format_value(v),
        }
    }

    pub fn push(&mut self, labels: Labels, value: f64) {
        self.samples.push(MetricSample { labels, value });
    }
}

/// Escape a Prometheus label value: backslash, double-quote, and newline.
pub fn escape_label_value(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format a float for Prometheus output.
/// Integral values are rendered without a decimal point.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string();
    }
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Render metric families into the Prometheus text exposition format.
pub fn encode(families: &[MetricFamily]) -> String {
    let mut out = String::new();
    for family in families {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "# HELP {} {}", family.name, escape_help(&family.help));
        let _ = writeln!(out, "# TYPE {} gauge", family.name);
        for sample in &family.samples {
            out.push_str(&family.name);
            if !sample.labels.is_empty() {
                out.push('{');
                for (i, (key, value)) in sample.labels.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{}=\"{}\"", key, escape_label_value(value));
                }
                out.push('}');
            }
            out.push(' ');
            out.push_str(&family.render_value(sample.value));
            out.push('\n');
        }
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}
