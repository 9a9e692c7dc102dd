use super::{HasStatus, StatusTransition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoStatus {
    #[default]
    Active,
    Inactive,
}

impl StatusTransition for PromoStatus {
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            PromoStatus::Active => &[PromoStatus::Inactive],
            PromoStatus::Inactive => &[PromoStatus::Active],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    #[serde(alias = "_id")]
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_order_amount: Option<f64>,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: PromoStatus,
}

impl PromoCode {
    /// Discount this code grants on `subtotal`.
    ///
    /// Zero below the minimum order amount. Percentages are capped at 100 and fixed
    /// amounts at the subtotal, so the result never exceeds `subtotal`.
    pub fn discount_for(&self, subtotal: f64) -> f64 {
        if subtotal <= 0.0 || self.min_order_amount.is_some_and(|min| subtotal < min) {
            return 0.0;
        }
        let discount = match self.discount_type {
            DiscountType::Percentage => subtotal * self.discount_value.clamp(0.0, 100.0) / 100.0,
            DiscountType::Fixed => self.discount_value.max(0.0),
        };
        discount.min(subtotal)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| self.used_count >= max)
    }
}

impl HasStatus for PromoCode {
    type Status = PromoStatus;

    fn status(&self) -> PromoStatus {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeCreate {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/promo-codes/validate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoValidate {
    pub code: String,
    pub order_amount: f64,
}

/// Reply of the validate route: the code plus the discount the server computed, or just
/// the code.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PromoValidation {
    Priced {
        #[serde(rename = "promoCode", alias = "promo")]
        promo_code: PromoCode,
        discount: f64,
    },
    Bare(PromoCode),
}

impl PromoValidation {
    /// The validated code and its discount on `subtotal`, preferring the server's figure.
    pub fn resolve(self, subtotal: f64) -> (PromoCode, f64) {
        match self {
            PromoValidation::Priced {
                promo_code,
                discount,
            } => (promo_code, discount),
            PromoValidation::Bare(code) => {
                let discount = code.discount_for(subtotal);
                (code, discount)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code(discount_type: DiscountType, value: f64, min: Option<f64>) -> PromoCode {
        PromoCode {
            id: "pc1".to_string(),
            code: "SPRING".to_string(),
            discount_type,
            discount_value: value,
            min_order_amount: min,
            max_uses: None,
            used_count: 0,
            expires_at: None,
            status: PromoStatus::Active,
        }
    }

    #[test]
    fn test_discount_rules() {
        assert_eq!(code(DiscountType::Percentage, 10.0, None).discount_for(200.0), 20.0);
        assert_eq!(code(DiscountType::Percentage, 150.0, None).discount_for(80.0), 80.0);
        assert_eq!(code(DiscountType::Fixed, 50.0, None).discount_for(30.0), 30.0);
        assert_eq!(code(DiscountType::Fixed, 5.0, Some(100.0)).discount_for(99.0), 0.0);
        assert_eq!(code(DiscountType::Fixed, 5.0, Some(100.0)).discount_for(100.0), 5.0);
    }

    #[test]
    fn test_validation_reply_shapes() {
        let document = json!({
            "_id": "pc1", "code": "SPRING", "discountType": "percentage", "discountValue": 10
        });
        let priced: PromoValidation =
            serde_json::from_value(json!({ "promoCode": document.clone(), "discount": 7.5 }))
                .unwrap();
        assert_eq!(priced.resolve(100.0).1, 7.5);

        let bare: PromoValidation = serde_json::from_value(document).unwrap();
        let (code, discount) = bare.resolve(100.0);
        assert_eq!(code.code, "SPRING");
        assert_eq!(discount, 10.0);
    }
}
