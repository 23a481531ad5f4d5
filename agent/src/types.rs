// File: agent/src/types.rs
use keeper::artifact::{ArtifactEntry, ArtifactPage};
use keeper::constants::limits;
use keeper::errors::StoreError;

pub use keeper::protocol::{
    AgentResponse, ArtifactNameRequest, DeleteResponse, ListArtifactsRequest, ListScopesRequest, ScopesResponse,
};

/// Cut one page out of a full, name-sorted listing. The page token is the
/// numeric offset of the first entry on the page.
pub fn paginate(
    entries: Vec<ArtifactEntry>,
    page_token: Option<&str>,
    page_size: Option<usize>,
) -> Result<ArtifactPage, StoreError> {
    let offset = match page_token {
        Some(token) => token.parse::<usize>().map_err(|_| StoreError::Backend {
            backend: "agent".to_string(),
            reason: format!("invalid page token '{}'", token),
        })?,
        None => 0,
    };
    let page_size = page_size.unwrap_or(limits::DEFAULT_PAGE_SIZE).max(1);

    let total = entries.len();
    let end = offset.saturating_add(page_size).min(total);
    let page: Vec<ArtifactEntry> = entries.into_iter().skip(offset).take(page_size).collect();

    Ok(ArtifactPage {
        entries: page,
        next_page_token: (end < total).then(|| end.to_string()),
    })
}
