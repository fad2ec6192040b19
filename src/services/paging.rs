//! Shared pagination arithmetic for the list endpoints.

use serde::Serialize;

pub const DEFAULT_LIMIT: i64 = 30;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy)]
pub struct PageParams {
  pub page: i64,
  pub limit: i64,
}

impl PageParams {
  /// Clamps raw query values into something safe to hand to LIMIT/OFFSET.
  pub fn clamped(page: Option<i64>, limit: Option<i64>) -> Self {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Self { page, limit }
  }

  pub fn offset(&self) -> i64 {
    (self.page - 1) * self.limit
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
  pub total: i64,
  pub page: i64,
  pub limit: i64,
  pub total_pages: i64,
}

impl PageInfo {
  pub fn new(params: PageParams, total: i64) -> Self {
    let total_pages = if total == 0 { 0 } else { (total + params.limit - 1) / params.limit };
    Self {
      total,
      page: params.page,
      limit: params.limit,
      total_pages,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clamps_page_and_limit() {
    let p = PageParams::clamped(Some(0), Some(10_000));
    assert_eq!(p.page, 1);
    assert_eq!(p.limit, MAX_LIMIT);

    let p = PageParams::clamped(None, None);
    assert_eq!(p.page, 1);
    assert_eq!(p.limit, DEFAULT_LIMIT);
  }

  #[test]
  fn offset_follows_page() {
    let p = PageParams::clamped(Some(3), Some(25));
    assert_eq!(p.offset(), 50);
  }

  #[test]
  fn total_pages_rounds_up() {
    let p = PageParams::clamped(Some(1), Some(10));
    assert_eq!(PageInfo::new(p, 0).total_pages, 0);
    assert_eq!(PageInfo::new(p, 10).total_pages, 1);
    assert_eq!(PageInfo::new(p, 11).total_pages, 2);
  }
}
