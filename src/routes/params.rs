use std::str::FromStr;

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{ProductFilter, ProductSortBy, ProductStatus, ProductType, SortOrder},
    validation::single_field_error,
};

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub page: Option<i64>,
    #[serde(alias = "limit", alias = "per_page")]
    pub per_page: Option<i64>,
}

impl Pagination {
    /// `(page, per_page, offset)` with page ≥ 1 and per_page in 1..=100.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

/// Catalog listing query. List values are comma separated, e.g.
/// `statuses=draft,published&categoryIds=1,4`.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    pub page: Option<i64>,
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
    #[serde(alias = "q")]
    pub search: Option<String>,
    pub statuses: Option<String>,
    pub types: Option<String>,
    /// Decimal price, inclusive.
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub category_ids: Option<String>,
    pub attribute_value_ids: Option<String>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn to_filter(&self) -> AppResult<ProductFilter> {
        let (_, per_page, offset) = self.pagination().normalize();
        let min_price_cents = price_bound(self.min_price, "minPrice")?;
        let max_price_cents = price_bound(self.max_price, "maxPrice")?;
        Ok(ProductFilter {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            statuses: parse_list::<ProductStatus>(self.statuses.as_deref(), "statuses")?,
            types: parse_list::<ProductType>(self.types.as_deref(), "types")?,
            min_price_cents,
            max_price_cents,
            category_ids: parse_list::<i64>(self.category_ids.as_deref(), "categoryIds")?,
            attribute_value_ids: parse_list::<i64>(
                self.attribute_value_ids.as_deref(),
                "attributeValueIds",
            )?,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
            limit: per_page,
            offset,
        })
    }
}

fn price_bound(price: Option<f64>, field: &str) -> AppResult<Option<i64>> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(single_field_error(
            field,
            &format!("{}_MIN", field.to_uppercase()),
            "Price bounds must not be negative",
        )),
        Some(p) => Ok(Some((p * 100.0).round() as i64)),
        None => Ok(None),
    }
}

fn parse_list<T: FromStr>(raw: Option<&str>, field: &str) -> AppResult<Vec<T>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                single_field_error(
                    field,
                    &format!("{}_INVALID", field.to_uppercase()),
                    &format!("Invalid value '{token}'"),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn pagination_clamps_page_and_size() {
        let pagination = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(pagination.normalize(), (1, 100, 0));
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        let third = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(third.normalize(), (3, 10, 20));
        let huge = Pagination {
            page: Some(i64::MAX),
            per_page: Some(20),
        };
        assert_eq!(huge.normalize(), (i64::MAX, 20, i64::MAX));
    }

    #[test]
    fn list_query_parses_comma_separated_values() {
        let query = ProductListQuery {
            search: Some("  shirt ".into()),
            statuses: Some("draft, published".into()),
            category_ids: Some("4,1,".into()),
            min_price: Some(9.99),
            sort_by: Some(ProductSortBy::Price),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.search.as_deref(), Some("shirt"));
        assert_eq!(
            filter.statuses,
            vec![ProductStatus::Draft, ProductStatus::Published]
        );
        assert_eq!(filter.category_ids, vec![4, 1]);
        assert_eq!(filter.min_price_cents, Some(999));
        assert_eq!(filter.sort_by, ProductSortBy::Price);
        assert_eq!(filter.sort_order, SortOrder::Asc);
        assert_eq!((filter.limit, filter.offset), (20, 0));
    }

    #[test]
    fn list_query_rejects_unknown_tokens_and_negative_prices() {
        let bad_status = ProductListQuery {
            statuses: Some("draft,sold".into()),
            ..Default::default()
        };
        let Err(AppError::Validation(fields)) = bad_status.to_filter() else {
            panic!("expected validation error");
        };
        assert_eq!(fields["statuses"].code, "STATUSES_INVALID");

        let negative = ProductListQuery {
            max_price: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.to_filter().is_err());
    }
}
