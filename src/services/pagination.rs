use crate::models::catalog::{Page, Pagination};

/// Page number from a raw query value. Missing, unparsable, or zero pages read as 1.
pub fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Slice one page out of a fully fetched listing.
///
/// Pages are 1-based. A page past the end is empty but still reports the
/// real totals.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        pagination: Pagination {
            page,
            total_pages,
            total_items,
            items_per_page: per_page,
        },
    }
}
