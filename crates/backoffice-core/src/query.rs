// ── Query pipeline ──
//
// Derived view of a collection: case-insensitive text filter over the
// schema's searchable fields, then a stable sort, then a page window.
// Pure functions over snapshots; nothing here touches the network.

use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::Arc;

use serde_json::Value;
use strum::{Display, EnumString};

use crate::model::schema::numeric_value;
use crate::model::{EntitySchema, FieldKind, Record, RecordId};

/// Sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    #[strum(to_string = "ascending", serialize = "asc", serialize = "ascend")]
    Ascending,
    #[strum(to_string = "descending", serialize = "desc", serialize = "descend")]
    Descending,
}

/// A sort key and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// User-controlled query parameters for one collection screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    filter_text: String,
    sort: Option<SortSpec>,
    page: NonZeroUsize,
    page_size: NonZeroUsize,
}

impl QueryState {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            filter_text: String::new(),
            sort: None,
            page: NonZeroUsize::MIN,
            page_size,
        }
    }

    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> NonZeroUsize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Replace the filter text. Always returns to the first page.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.page = NonZeroUsize::MIN;
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: NonZeroUsize) {
        self.page = page;
    }

    /// Change the page size. The current page number is kept even if it
    /// now lies past the end; the view is then empty.
    pub fn set_page_size(&mut self, page_size: NonZeroUsize) {
        self.page_size = page_size;
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN))
    }
}

/// One page of a filtered, sorted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryView {
    pub items: Vec<Arc<Record>>,
    /// Number of records matching the filter, across all pages.
    pub total: usize,
    pub page: NonZeroUsize,
    pub page_size: NonZeroUsize,
}

impl QueryView {
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.get())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Run the whole pipeline: filter, sort, window.
pub fn run(schema: &EntitySchema, items: &[Arc<Record>], query: &QueryState) -> QueryView {
    let mut matched = filter(schema, items, &query.filter_text);
    if let Some(ref spec) = query.sort {
        sort(schema, &mut matched, spec);
    }
    let total = matched.len();
    let items = window(matched, query.page, query.page_size);

    QueryView {
        items,
        total,
        page: query.page,
        page_size: query.page_size,
    }
}

/// Records whose searchable fields contain `text`, ignoring case.
///
/// Empty text matches everything. Order is preserved.
pub fn filter(schema: &EntitySchema, items: &[Arc<Record>], text: &str) -> Vec<Arc<Record>> {
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }

    let fields: Vec<&str> = schema.searchable_fields().collect();
    items
        .iter()
        .filter(|record| {
            fields.iter().any(|field| {
                record
                    .text(field)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect()
}

/// Stable sort by one key. Records missing the key sort first.
///
/// Descending order inverts the comparison rather than reversing the
/// result, so equal keys keep their relative order in both directions.
pub fn sort(schema: &EntitySchema, items: &mut [Arc<Record>], spec: &SortSpec) {
    let kind = schema.kind_of(&spec.key);
    items.sort_by(|a, b| {
        let ka = SortKey::of(a, &spec.key, kind);
        let kb = SortKey::of(b, &spec.key, kind);
        match spec.direction {
            SortDirection::Ascending => ka.compare(&kb),
            SortDirection::Descending => kb.compare(&ka),
        }
    });
}

/// Slice out page `page` (1-based). Out-of-range pages are empty.
pub fn window(items: Vec<Arc<Record>>, page: NonZeroUsize, page_size: NonZeroUsize) -> Vec<Arc<Record>> {
    let start = (page.get() - 1).saturating_mul(page_size.get());
    items.into_iter().skip(start).take(page_size.get()).collect()
}

// ── Sort keys ────────────────────────────────────────────────────────

/// Comparable projection of a field value.
///
/// Ranks across types: missing < bool < number < text < id.
#[derive(Debug)]
enum SortKey<'a> {
    Missing,
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Id(&'a RecordId),
}

impl<'a> SortKey<'a> {
    fn of(record: &'a Record, key: &str, kind: Option<FieldKind>) -> Self {
        if key == "id" {
            return record.id.as_ref().map_or(Self::Missing, Self::Id);
        }

        let Some(value) = record.get(key) else {
            return Self::Missing;
        };

        if kind == Some(FieldKind::Number) {
            return numeric_value(value).map_or(Self::Missing, Self::Number);
        }

        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Missing, Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Text(_) => 3,
            Self::Id(_) => 4,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Id(a), Self::Id(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn product(id: i64, title: &str, price: f64) -> Arc<Record> {
        Arc::new(
            Record::new()
                .with_id(id)
                .with("title", title)
                .with("price", price),
        )
    }

    fn ids(items: &[Arc<Record>]) -> Vec<i64> {
        items
            .iter()
            .map(|r| match r.id {
                Some(RecordId::Int(n)) => n,
                _ => panic!("expected integer id"),
            })
            .collect()
    }

    fn catalog() -> Vec<Arc<Record>> {
        vec![
            product(1, "Desk Lamp", 30.0),
            product(2, "Chair", 10.0),
            product(3, "Lamp Shade", 20.0),
            product(4, "Table", 10.0),
        ]
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let schema = EntitySchema::products();
        let matched = filter(&schema, &catalog(), "LAMP");
        assert_eq!(ids(&matched), vec![1, 3]);
    }

    #[test]
    fn filter_ignores_non_searchable_fields() {
        let schema = EntitySchema::products();
        let items = vec![Arc::new(
            Record::new()
                .with_id(1)
                .with("title", "Chair")
                .with("description", "lamp-adjacent"),
        )];
        assert!(filter(&schema, &items, "lamp").is_empty());
    }

    #[test]
    fn empty_filter_matches_everything() {
        let schema = EntitySchema::users();
        assert_eq!(filter(&schema, &catalog(), "").len(), 4);
    }

    #[test]
    fn filter_text_is_matched_verbatim() {
        let schema = EntitySchema::users();
        let items = vec![Arc::new(Record::new().with_id(1).with("firstName", "John"))];

        assert!(filter(&schema, &items, "john ").is_empty());
        assert!(filter(&schema, &items, " ").is_empty());
        assert_eq!(filter(&schema, &items, "JOHN").len(), 1);
    }

    #[test]
    fn sort_ascending_is_stable() {
        let schema = EntitySchema::products();
        let mut items = catalog();
        sort(&schema, &mut items, &SortSpec::ascending("price"));
        assert_eq!(ids(&items), vec![2, 4, 3, 1]);
    }

    #[test]
    fn sort_descending_keeps_ties_in_order() {
        let schema = EntitySchema::products();
        let mut items = catalog();
        sort(&schema, &mut items, &SortSpec::descending("price"));
        assert_eq!(ids(&items), vec![1, 3, 2, 4]);
    }

    #[test]
    fn sort_numeric_strings_by_value() {
        let schema = EntitySchema::products();
        let mut items = vec![
            Arc::new(Record::new().with_id(1).with("price", "100")),
            Arc::new(Record::new().with_id(2).with("price", "9")),
            Arc::new(Record::new().with_id(3)),
        ];
        sort(&schema, &mut items, &SortSpec::ascending("price"));
        assert_eq!(ids(&items), vec![3, 2, 1]);
    }

    #[test]
    fn sort_by_text_and_by_id() {
        let schema = EntitySchema::products();
        let mut items = catalog();
        sort(&schema, &mut items, &SortSpec::ascending("title"));
        assert_eq!(ids(&items), vec![2, 1, 3, 4]);

        sort(&schema, &mut items, &SortSpec::descending("id"));
        assert_eq!(ids(&items), vec![4, 3, 2, 1]);
    }

    #[test]
    fn window_slices_pages() {
        let items = catalog();
        assert_eq!(ids(&window(items.clone(), nz(1), nz(3))), vec![1, 2, 3]);
        assert_eq!(ids(&window(items.clone(), nz(2), nz(3))), vec![4]);
        assert!(window(items, nz(3), nz(3)).is_empty());
    }

    #[test]
    fn run_combines_filter_sort_and_window() {
        let schema = EntitySchema::products();
        let mut query = QueryState::new(nz(1)).with_sort(schema.default_sort.clone());
        query.set_filter("lamp");
        query.set_page(nz(2));

        let view = run(&schema, &catalog(), &query);
        assert_eq!(view.total, 2);
        assert_eq!(view.page_count(), 2);
        // Lamp Shade (20) sorts before Desk Lamp (30).
        assert_eq!(ids(&view.items), vec![1]);
    }

    #[test]
    fn set_filter_resets_page_but_page_size_does_not() {
        let mut query = QueryState::new(nz(5));
        query.set_page(nz(3));
        query.set_page_size(nz(2));
        assert_eq!(query.page(), nz(3));

        query.set_filter("x");
        assert_eq!(query.page(), NonZeroUsize::MIN);
    }

    #[test]
    fn page_past_the_end_is_empty_view() {
        let schema = EntitySchema::users();
        let mut query = QueryState::new(nz(10));
        query.set_page(nz(9));
        let view = run(&schema, &catalog(), &query);
        assert!(view.is_empty());
        assert_eq!(view.total, 4);
        assert_eq!(view.page_count(), 1);
    }

    #[test]
    fn direction_parses_short_forms() {
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Descending);
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Ascending);
        assert_eq!(SortDirection::Descending.to_string(), "descending");
    }
}
