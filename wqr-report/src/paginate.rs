//! Pure pagination: page count and page-to-content assignment.
//!
//! Both rendering surfaces derive their page list from these functions and
//! nothing else; there is no shared counter to drift.

use crate::model::PageContent;

/// Points shown per grid page, volume and quality alike.
pub const POINTS_PER_PAGE: usize = 4;

/// Total page count: one summary page, the volume grid pages, the quality
/// grid pages, and the measurement table when present.
pub fn total_pages(volume_points: usize, quality_points: usize, has_table: bool) -> usize {
    1 + volume_points.div_ceil(POINTS_PER_PAGE)
        + quality_points.div_ceil(POINTS_PER_PAGE)
        + usize::from(has_table)
}

/// Assign content to pages. Volume page `k` holds points
/// `[4k, 4k + 4)`; quality pages follow all volume pages with the same
/// grouping; the table, when present, is always last. A degenerate input
/// still yields a single summary page rather than an empty report.
pub fn page_contents(
    volume_ids: &[String],
    quality_ids: &[String],
    has_table: bool,
) -> Vec<PageContent> {
    let mut pages = Vec::with_capacity(total_pages(volume_ids.len(), quality_ids.len(), has_table));
    pages.push(PageContent::Summary);
    for group in volume_ids.chunks(POINTS_PER_PAGE) {
        pages.push(PageContent::VolumeGrid {
            point_ids: group.to_vec(),
        });
    }
    for group in quality_ids.chunks(POINTS_PER_PAGE) {
        pages.push(PageContent::QualityGrid {
            point_ids: group.to_vec(),
        });
    }
    if has_table {
        pages.push(PageContent::MeasurementTable);
    }
    if pages.is_empty() {
        pages.push(PageContent::Summary);
    }
    pages
}
