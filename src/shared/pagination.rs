use serde::{Deserialize, Serialize};

pub const MAX_PAGE_SIZE: u64 = 100;

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl PageParams {
    /// Clamps page to >= 1 and limit to 1..=MAX_PAGE_SIZE.
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            data,
            total,
            page: params.page,
            limit: params.limit,
            total_pages: total.div_ceil(params.limit.max(1)),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let params = PageParams { page: 1, limit: 20 };
        assert_eq!(Paginated::<i32>::new(vec![], 0, params).total_pages, 0);
        assert_eq!(Paginated::<i32>::new(vec![], 20, params).total_pages, 1);
        assert_eq!(Paginated::<i32>::new(vec![], 21, params).total_pages, 2);
        assert_eq!(Paginated::<i32>::new(vec![], 199, params).total_pages, 10);
    }

    #[test]
    fn normalized_clamps_out_of_range_params() {
        let params = PageParams { page: 0, limit: 0 }.normalized();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 1);

        let params = PageParams {
            page: 3,
            limit: 1000,
        }
        .normalized();
        assert_eq!(params.limit, MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 2 * MAX_PAGE_SIZE);
    }
}
