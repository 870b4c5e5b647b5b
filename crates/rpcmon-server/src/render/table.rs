use rpcmon_common::paging;

/// Pagination bar for a log table: first/previous arrows, a window of
/// numbered links, next/last arrows. Links dispatch to the client-side
/// `changePage(tableId, page)` handler.
pub fn pagination_bar(current: usize, total: usize, table_id: &str) -> String {
    if total <= 1 {
        return String::new();
    }

    let (first, last) = paging::visible_window(current, total);
    let mut links = String::new();

    if current > 1 {
        links.push_str(&format!(
            r#"<a onclick="changePage('{table_id}', 1)" class="page-link">&laquo;</a>"#
        ));
        links.push_str(&format!(
            r#"<a onclick="changePage('{table_id}', {})" class="page-link">&lsaquo;</a>"#,
            current - 1
        ));
    }

    for page in first..=last {
        let active = if page == current { " active" } else { "" };
        links.push_str(&format!(
            r#"<a onclick="changePage('{table_id}', {page})" class="page-link{active}">{page}</a>"#
        ));
    }

    if current < total {
        links.push_str(&format!(
            r#"<a onclick="changePage('{table_id}', {})" class="page-link">&rsaquo;</a>"#,
            current + 1
        ));
        links.push_str(&format!(
            r#"<a onclick="changePage('{table_id}', {total})" class="page-link">&raquo;</a>"#
        ));
    }

    format!(r#"<div class="pagination">{links}</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_renders_nothing() {
        assert_eq!(pagination_bar(1, 1, "t"), "");
        assert_eq!(pagination_bar(1, 0, "t"), "");
    }

    #[test]
    fn first_page_has_no_back_arrows() {
        let bar = pagination_bar(1, 10, "logs");
        assert!(!bar.contains("&laquo;"));
        assert!(!bar.contains("&lsaquo;"));
        assert!(bar.contains("&rsaquo;"));
        assert!(bar.contains("&raquo;"));
    }

    #[test]
    fn last_page_has_no_forward_arrows() {
        let bar = pagination_bar(10, 10, "logs");
        assert!(bar.contains("&laquo;"));
        assert!(!bar.contains("&rsaquo;"));
    }

    #[test]
    fn current_page_is_marked_active() {
        let bar = pagination_bar(5, 10, "logs");
        assert!(bar.contains(r#"class="page-link active">5</a>"#));
        // Window is 3..=7 around the current page.
        assert!(bar.contains(">3</a>"));
        assert!(bar.contains(">7</a>"));
        assert!(!bar.contains(">8</a>"));
    }

    #[test]
    fn arrows_target_adjacent_and_extreme_pages() {
        let bar = pagination_bar(5, 10, "logs");
        assert!(bar.contains("changePage('logs', 1)"));
        assert!(bar.contains("changePage('logs', 4)"));
        assert!(bar.contains("changePage('logs', 6)"));
        assert!(bar.contains("changePage('logs', 10)"));
    }
}
