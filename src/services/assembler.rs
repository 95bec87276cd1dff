//! Builds one page of the todo list: attaches details to every task, sorts
//! the enriched list and slices out the requested page.
//!
//! Paging parameters never produce an error. Anything unparsable or out of
//! range falls back to a default, and a page past the end yields an empty
//! first page.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::details::TaskDetails;
use crate::models::task::{Task, TaskWithDetails};
use crate::repositories::TaskDetailsRepository;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Raw query string of the list endpoint. Kept as strings so malformed
/// numbers degrade to defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// One of `task`, `date_start`, `date_due`, `completed`, `updated_at`, `created_at`.
    pub sort_by: Option<String>,
    /// `ASC` (default) or `DESC`.
    pub sort_order: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Items per page, 1 to 100.
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Task,
    DateStart,
    DateDue,
    Completed,
    UpdatedAt,
    CreatedAt,
}

impl SortField {
    pub fn parse(value: &str) -> Self {
        match value {
            "task" => SortField::Task,
            "date_start" => SortField::DateStart,
            "date_due" => SortField::DateDue,
            "completed" => SortField::Completed,
            "updated_at" => SortField::UpdatedAt,
            _ => SortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Empty means ascending; anything other than `ASC` is descending.
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "ASC" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: usize,
    pub limit: usize,
}

impl Default for ListParams {
    fn default() -> Self {
        ListParams {
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Asc,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListParams {
    pub fn from_query(query: &ListQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE);

        // Out-of-range limits fall back to the default rather than clamping.
        let limit = query
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| (1..=MAX_LIMIT).contains(l))
            .unwrap_or(DEFAULT_LIMIT);

        ListParams {
            sort_by: SortField::parse(query.sort_by.as_deref().unwrap_or("")),
            sort_order: SortOrder::parse(query.sort_order.as_deref().unwrap_or("")),
            page,
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Page {
    pub items: Vec<TaskWithDetails>,
    pub pagination: Pagination,
}

/// Best-effort details lookup: a failed lookup or a record without an id
/// both mean "no details".
pub async fn attached_details(
    details: &dyn TaskDetailsRepository,
    task_id: &str,
) -> Option<TaskDetails> {
    match details.find_by_task_id(task_id).await {
        Ok(Some(found)) if !found.id.is_empty() => Some(found),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Details lookup failed for task {}: {}", task_id, e);
            None
        }
    }
}

/// Attaches each task's details record. Lookups run concurrently but results
/// stay paired with their task and in fetch order.
pub async fn enrich(tasks: Vec<Task>, details: &dyn TaskDetailsRepository) -> Vec<TaskWithDetails> {
    let lookups = join_all(tasks.iter().map(|task| attached_details(details, &task.id))).await;

    tasks
        .into_iter()
        .zip(lookups)
        .map(|(task, attached)| TaskWithDetails::new(task, attached))
        .collect()
}

/// Missing dates compare greater than any present date.
fn cmp_absent_last(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &TaskWithDetails, b: &TaskWithDetails, field: SortField) -> Ordering {
    match field {
        SortField::Task => a.task.cmp(&b.task),
        SortField::DateStart => cmp_absent_last(a.date_start, b.date_start),
        SortField::DateDue => cmp_absent_last(a.date_due, b.date_due),
        SortField::Completed => a.completed.cmp(&b.completed),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

/// Stable sort. Descending inverts each comparison, so ties keep fetch order
/// in both directions and missing dates lead a descending list.
pub fn sort_tasks(items: &mut [TaskWithDetails], field: SortField, order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

pub fn paginate(items: Vec<TaskWithDetails>, page: usize, limit: usize) -> Page {
    let limit = limit.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(limit);

    let mut page = page.max(1);
    let mut start = (page - 1).saturating_mul(limit);
    let mut end = start.saturating_add(limit);

    if start >= total_items {
        start = 0;
        end = 0;
        page = 1;
    }
    end = end.min(total_items);

    let items: Vec<TaskWithDetails> = items.into_iter().skip(start).take(end - start).collect();

    Page {
        items,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
            has_next: page < total_pages,
            has_prev: page > 1,
        },
    }
}

pub async fn assemble(
    tasks: Vec<Task>,
    details: &dyn TaskDetailsRepository,
    params: &ListParams,
) -> Page {
    let mut enriched = enrich(tasks, details).await;
    sort_tasks(&mut enriched, params.sort_by, params.sort_order);
    paginate(enriched, params.page, params.limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::details::DetailsFields;
    use crate::repositories::memory::MemoryStore;
    use crate::repositories::StoreResult;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn task(n: i64) -> Task {
        let created = base_time() + Duration::minutes(n);
        Task {
            id: format!("task-{}", n),
            user_id: "user-1".to_string(),
            task: format!("task {}", n),
            date_start: None,
            date_due: None,
            completed: false,
            created_at: created,
            updated_at: created,
        }
    }

    fn enriched(tasks: Vec<Task>) -> Vec<TaskWithDetails> {
        tasks.into_iter().map(|t| TaskWithDetails::new(t, None)).collect()
    }

    fn query(sort_by: Option<&str>, sort_order: Option<&str>, page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            sort_by: sort_by.map(String::from),
            sort_order: sort_order.map(String::from),
            page: page.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn missing_parameters_use_defaults() {
        assert_eq!(ListParams::from_query(&ListQuery::default()), ListParams::default());
    }

    #[test]
    fn malformed_paging_falls_back_to_defaults() {
        for (page, limit) in [("0", "0"), ("-2", "101"), ("abc", "ten"), ("", "")] {
            let params = ListParams::from_query(&query(None, None, Some(page), Some(limit)));
            assert_eq!(params.page, DEFAULT_PAGE, "page {:?}", page);
            assert_eq!(params.limit, DEFAULT_LIMIT, "limit {:?}", limit);
        }

        let params = ListParams::from_query(&query(None, None, Some("4"), Some("100")));
        assert_eq!((params.page, params.limit), (4, 100));
    }

    #[test]
    fn sort_parameters_are_normalised() {
        let params = ListParams::from_query(&query(Some("priority"), Some("sideways"), None, None));
        assert_eq!(params.sort_by, SortField::CreatedAt);
        assert_eq!(params.sort_order, SortOrder::Desc);

        let params = ListParams::from_query(&query(Some("date_due"), Some("ASC"), None, None));
        assert_eq!(params.sort_by, SortField::DateDue);
        assert_eq!(params.sort_order, SortOrder::Asc);

        assert_eq!(SortOrder::parse("asc"), SortOrder::Desc);
    }

    #[test]
    fn first_page_of_twelve_is_sorted_by_creation() {
        // Shuffled fetch order.
        let tasks: Vec<Task> = [7, 2, 11, 0, 5, 9, 1, 10, 3, 8, 6, 4].into_iter().map(task).collect();
        let mut items = enriched(tasks);
        sort_tasks(&mut items, SortField::CreatedAt, SortOrder::Asc);
        let page = paginate(items, 1, 10);

        assert_eq!(page.items.len(), 10);
        assert!(page.items.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(page.items[0].id, "task-0");
        assert_eq!(
            page.pagination,
            Pagination {
                current_page: 1,
                total_pages: 2,
                total_items: 12,
                items_per_page: 10,
                has_next: true,
                has_prev: false,
            }
        );
    }

    #[test]
    fn last_page_is_partial() {
        let page = paginate(enriched((0..12).map(task).collect()), 2, 10);
        assert_eq!(page.items.len(), 2);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn page_past_the_end_is_empty_first_page() {
        let page = paginate(enriched((0..12).map(task).collect()), 3, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.current_page, 1);
        assert_eq!(page.pagination.total_items, 12);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_prev);
    }

    #[test]
    fn empty_input_yields_empty_page() {
        let page = paginate(Vec::new(), 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.current_page, 1);
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn huge_page_number_does_not_overflow() {
        let page = paginate(enriched((0..3).map(task).collect()), usize::MAX, 100);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.current_page, 1);
    }

    #[test]
    fn page_size_matches_remaining_items() {
        let total = 23;
        for limit in [1, 7, 10, 23, 100] {
            for page in 1..=(total / limit + 1) {
                let result = paginate(enriched((0..total as i64).map(task).collect()), page, limit);
                let start = (page - 1) * limit;
                let expected = if start >= total { 0 } else { limit.min(total - start) };
                assert_eq!(result.items.len(), expected, "page {} limit {}", page, limit);
            }
        }
    }

    #[test]
    fn task_title_sort_is_lexicographic() {
        let mut tasks: Vec<Task> = (0..5).map(task).collect();
        for (t, title) in tasks.iter_mut().zip(["pears", "Apples", "apples", "bread", "Zucchini"]) {
            t.task = title.to_string();
        }
        let mut items = enriched(tasks);
        sort_tasks(&mut items, SortField::Task, SortOrder::Asc);

        let titles: Vec<&str> = items.iter().map(|i| i.task.as_str()).collect();
        assert_eq!(titles, vec!["Apples", "Zucchini", "apples", "bread", "pears"]);
    }

    #[test]
    fn missing_due_dates_sort_last_when_ascending() {
        let mut with_due = task(1);
        with_due.date_due = Some(base_time() + Duration::days(3));
        let without_due = task(0);

        let mut items = enriched(vec![without_due, with_due]);
        sort_tasks(&mut items, SortField::DateDue, SortOrder::Asc);
        assert_eq!(items[0].id, "task-1");
        assert_eq!(items[1].id, "task-0");

        sort_tasks(&mut items, SortField::DateDue, SortOrder::Desc);
        assert_eq!(items[0].id, "task-0");
        assert_eq!(items[1].id, "task-1");
    }

    #[test]
    fn present_start_dates_sort_chronologically() {
        let mut tasks: Vec<Task> = (0..4).map(task).collect();
        tasks[0].date_start = Some(base_time() + Duration::days(5));
        tasks[1].date_start = None;
        tasks[2].date_start = Some(base_time() + Duration::days(1));
        tasks[3].date_start = Some(base_time() + Duration::days(3));

        let mut items = enriched(tasks);
        sort_tasks(&mut items, SortField::DateStart, SortOrder::Asc);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["task-2", "task-3", "task-0", "task-1"]);

        sort_tasks(&mut items, SortField::DateStart, SortOrder::Desc);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["task-1", "task-0", "task-3", "task-2"]);
    }

    #[test]
    fn incomplete_tasks_come_first() {
        let mut tasks: Vec<Task> = (0..4).map(task).collect();
        tasks[0].completed = true;
        tasks[2].completed = true;

        let mut items = enriched(tasks);
        sort_tasks(&mut items, SortField::Completed, SortOrder::Asc);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        // Ties keep fetch order.
        assert_eq!(ids, vec!["task-1", "task-3", "task-0", "task-2"]);
    }

    #[test]
    fn descending_updated_at_puts_latest_first() {
        let mut tasks: Vec<Task> = (0..3).map(task).collect();
        tasks[0].updated_at = base_time() + Duration::days(10);

        let mut items = enriched(tasks);
        sort_tasks(&mut items, SortField::UpdatedAt, SortOrder::Desc);
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["task-0", "task-2", "task-1"]);
    }

    #[tokio::test]
    async fn details_are_attached_when_present() {
        let store = MemoryStore::new();
        TaskDetailsRepository::create(
            &store,
            "task-1",
            DetailsFields {
                priority: "high".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let items = enrich(vec![task(0), task(1)], &store).await;
        assert!(items[0].details.is_none());
        assert_eq!(items[1].details.as_ref().map(|d| d.priority.as_str()), Some("high"));
    }

    /// Fails every lookup for one task and returns a blank record for another.
    struct FlakyDetails;

    #[async_trait]
    impl TaskDetailsRepository for FlakyDetails {
        async fn list(&self) -> StoreResult<Vec<TaskDetails>> {
            Ok(Vec::new())
        }

        async fn get(&self, _id: &str) -> StoreResult<Option<TaskDetails>> {
            Ok(None)
        }

        async fn find_by_task_id(&self, task_id: &str) -> StoreResult<Option<TaskDetails>> {
            match task_id {
                "task-0" => Err(sqlx::Error::PoolTimedOut.into()),
                "task-1" => Ok(Some(TaskDetails {
                    id: String::new(),
                    task_id: task_id.to_string(),
                    summary: String::new(),
                    notes: String::new(),
                    status: String::new(),
                    priority: String::new(),
                    created_at: base_time(),
                    updated_at: base_time(),
                })),
                _ => Ok(None),
            }
        }

        async fn create(&self, _task_id: &str, _fields: DetailsFields) -> StoreResult<TaskDetails> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn update(&self, _id: &str, _fields: DetailsFields) -> StoreResult<Option<TaskDetails>> {
            Ok(None)
        }

        async fn delete(&self, _id: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    /// Answers every lookup, but the earliest tasks answer last.
    struct SlowDetails;

    #[async_trait]
    impl TaskDetailsRepository for SlowDetails {
        async fn list(&self) -> StoreResult<Vec<TaskDetails>> {
            Ok(Vec::new())
        }

        async fn get(&self, _id: &str) -> StoreResult<Option<TaskDetails>> {
            Ok(None)
        }

        async fn find_by_task_id(&self, task_id: &str) -> StoreResult<Option<TaskDetails>> {
            let n: u64 = task_id.trim_start_matches("task-").parse().unwrap_or(0);
            tokio::time::sleep(std::time::Duration::from_millis(5 * (6 - n.min(6)))).await;

            Ok(Some(TaskDetails {
                id: format!("details-{}", task_id),
                task_id: task_id.to_string(),
                summary: format!("about {}", task_id),
                notes: String::new(),
                status: String::new(),
                priority: String::new(),
                created_at: base_time(),
                updated_at: base_time(),
            }))
        }

        async fn create(&self, _task_id: &str, _fields: DetailsFields) -> StoreResult<TaskDetails> {
            Err(sqlx::Error::PoolTimedOut.into())
        }

        async fn update(&self, _id: &str, _fields: DetailsFields) -> StoreResult<Option<TaskDetails>> {
            Ok(None)
        }

        async fn delete(&self, _id: &str) -> StoreResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn details_stay_paired_when_lookups_finish_out_of_order() {
        let tasks: Vec<Task> = [3, 0, 5, 1, 4, 2].into_iter().map(task).collect();

        let items = enrich(tasks, &SlowDetails).await;
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["task-3", "task-0", "task-5", "task-1", "task-4", "task-2"]);
        for item in &items {
            let details = item.details.as_ref().unwrap();
            assert_eq!(details.task_id, item.id);
            assert_eq!(details.id, format!("details-{}", item.id));
        }

        let page = assemble((0..6).map(task).collect(), &SlowDetails, &ListParams::default()).await;
        let summaries: Vec<&str> = page
            .items
            .iter()
            .map(|i| i.details.as_ref().unwrap().summary.as_str())
            .collect();
        assert_eq!(
            summaries,
            vec!["about task-0", "about task-1", "about task-2", "about task-3", "about task-4", "about task-5"]
        );
    }

    #[tokio::test]
    async fn failed_or_blank_lookups_leave_details_empty() {
        let params = ListParams::default();
        let page = assemble(vec![task(2), task(0), task(1)], &FlakyDetails, &params).await;

        assert_eq!(page.items.len(), 3);
        assert!(page.items.iter().all(|i| i.details.is_none()));
        assert_eq!(page.items[0].id, "task-0");
    }

    #[tokio::test]
    async fn assembling_twice_gives_identical_output() {
        let store = MemoryStore::new();
        let tasks: Vec<Task> = (0..15).rev().map(task).collect();
        let params = ListParams::from_query(&query(Some("task"), Some("DESC"), Some("2"), Some("4")));

        let first = assemble(tasks.clone(), &store, &params).await;
        let second = assemble(tasks, &store, &params).await;

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
