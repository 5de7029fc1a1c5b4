use std::fmt;
use url::form_urlencoded::byte_serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperation {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    Exists,
    In,
    NotIn,
    GreaterThan,
    GreaterThanOrEquals,
    LowerThan,
    LowerThanOrEquals,
    Between,
    Has,
    NotHas,
}

impl FilterOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperation::Equals => "eq",
            FilterOperation::NotEquals => "ne",
            FilterOperation::Contains => "cnt",
            FilterOperation::NotContains => "!cnt",
            FilterOperation::Exists => "ex",
            FilterOperation::In => "in",
            FilterOperation::NotIn => "!in",
            FilterOperation::GreaterThan => "gt",
            FilterOperation::GreaterThanOrEquals => "gte",
            FilterOperation::LowerThan => "lt",
            FilterOperation::LowerThanOrEquals => "lte",
            FilterOperation::Between => "btw",
            FilterOperation::Has => "has",
            FilterOperation::NotHas => "!has",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub operation: FilterOperation,
    pub field: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorting {
    pub fields: Vec<String>,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub number: u32,
    pub size: u32,
}

/// Query criteria for collection endpoints.
///
/// Rendered with `Display` as `page.page=..&page.size=..&filter.{op}.{field}=..&page.sort=..`,
/// each part present only when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOption {
    pub paging: Option<Paging>,
    pub conditions: Vec<Condition>,
    pub sorting: Option<Sorting>,
}

impl FilterOption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, number: u32, size: u32) -> Self {
        self.paging = Some(Paging { number, size });
        self
    }

    pub fn condition(
        mut self,
        operation: FilterOperation,
        field: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.conditions.push(Condition {
            operation,
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn equals(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.condition(FilterOperation::Equals, field, [value])
    }

    pub fn sort_by(mut self, fields: &[&str], direction: SortDirection) -> Self {
        self.sorting = Some(Sorting {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            direction,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.paging.is_none() && self.conditions.is_empty() && self.sorting.is_none()
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(paging) = &self.paging {
            parts.push(format!("page.page={}", paging.number));
            parts.push(format!("page.size={}", paging.size));
        }

        for condition in &self.conditions {
            let values: Vec<String> = condition.values.iter().map(|v| encode(v)).collect();
            parts.push(format!(
                "filter.{}.{}={}",
                condition.operation.as_str(),
                encode(&condition.field),
                values.join(",")
            ));
        }

        if let Some(sorting) = &self.sorting {
            let direction = match sorting.direction {
                SortDirection::Ascending => "ASC",
                SortDirection::Descending => "DESC",
            };
            let mut fields: Vec<String> = sorting.fields.iter().map(|s| encode(s)).collect();
            fields.push(direction.to_string());
            parts.push(format!("page.sort={}", fields.join(",")));
        }

        f.write_str(&parts.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_renders_nothing() {
        let filter = FilterOption::new();
        assert!(filter.is_empty());
        assert_eq!(filter.to_string(), "");
    }

    #[test]
    fn test_paging_conditions_and_sorting_order() {
        let filter = FilterOption::new()
            .sort_by(&["logTime"], SortDirection::Descending)
            .equals("item", "42")
            .page(2, 50);

        assert_eq!(
            filter.to_string(),
            "page.page=2&page.size=50&filter.eq.item=42&page.sort=logTime,DESC"
        );
    }

    #[test]
    fn test_multi_value_condition_joins_with_comma() {
        let filter = FilterOption::new().condition(
            FilterOperation::In,
            "level",
            ["error", "fatal"],
        );

        assert_eq!(filter.to_string(), "filter.in.level=error,fatal");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let filter = FilterOption::new()
            .condition(FilterOperation::NotContains, "message", ["a&b c"]);

        assert_eq!(filter.to_string(), "filter.!cnt.message=a%26b+c");
    }
}
