//! `Link` header pagination.

/// Page numbers advertised by a `Link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkPagination {
    pub next_page: Option<u32>,
    pub last_page: Option<u32>,
}

impl LinkPagination {
    /// Total page count as seen from `current`. The last page of a listing
    /// carries no `rel="last"`, so fall back to `next`, then to `current`.
    pub fn last_page_from(&self, current: u32) -> u32 {
        self.last_page
            .or(self.next_page)
            .unwrap_or(current)
            .max(current)
    }
}

/// Parse a GitHub `Link` header.
///
/// Link headers look like:
/// `<https://api.github.com/user/starred?per_page=100&page=2>; rel="next", <...&page=5>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(value) = segment.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel)) = (url, rel)
            && let Some(page) = page_param(url)
        {
            match rel {
                "next" => info.next_page = Some(page),
                "last" => info.last_page = Some(page),
                _ => {}
            }
        }
    }

    info
}

fn page_param(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}
