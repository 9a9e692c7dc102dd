use crate::api::ResourceApi;
use crate::clients::crud;
use crate::model::{
    PromoCode, PromoCodeCreate, PromoCodeUpdate, PromoStatus, PromoValidate, PromoValidation,
};
use crate::promo_code_slice::PromoCodeError;
use slice_framework::{ApiError, Fold, Operation, SliceClient, Target};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument};

async fn post_validation(
    api: Arc<ResourceApi<PromoCode>>,
    body: PromoValidate,
    discount_to: oneshot::Sender<f64>,
) -> Result<Fold<PromoCode>, ApiError> {
    let validation: PromoValidation = api.post_to("validate", &body).await?;
    let (code, discount) = validation.resolve(body.order_amount);
    // The caller may have given up waiting; the code is selected either way.
    let _ = discount_to.send(discount);
    Ok(Fold::Select(Some(code)))
}

/// Client for promo codes.
///
/// At checkout, [`validate_code`](Self::validate_code) asks the server whether a code
/// applies to the current subtotal. A refused code leaves its per-field messages in the
/// slice's `field_errors`, so the form can show them next to the input.
#[derive(Clone)]
pub struct PromoCodeClient {
    inner: SliceClient<PromoCode>,
}

crate::impl_admin_client!(
    PromoCodeClient,
    PromoCode,
    PromoCodeError,
    PromoCodeCreate,
    PromoCodeUpdate,
    promo_code,
    promo_codes,
);

impl PromoCodeClient {
    /// Validates `code` against `subtotal`, selects it and returns the discount it grants.
    ///
    /// Typing a new code before the previous answer arrived supersedes the earlier check.
    #[instrument(skip(self))]
    pub async fn validate_code(&self, code: &str, subtotal: f64) -> Result<f64, PromoCodeError> {
        debug!("Sending request");
        let body = PromoValidate {
            code: code.trim().to_string(),
            order_amount: subtotal,
        };
        let (discount_to, discount) = oneshot::channel();
        let operation = Operation::new("validate_code", Target::Selection, move |api| {
            post_validation(api, body, discount_to)
        });
        let outcome = self.inner.dispatch(operation).await.map_err(PromoCodeError::from)?;

        let discount = match discount.await {
            Ok(discount) => discount,
            Err(_) => outcome
                .entity()
                .map_or(0.0, |promo| promo.discount_for(subtotal)),
        };
        info!(discount, "Promo code accepted");
        Ok(discount)
    }

    /// Forgets the applied code.
    pub async fn clear_applied_code(&self) -> Result<(), PromoCodeError> {
        self.inner
            .apply(Fold::Select(None))
            .await
            .map(|_| ())
            .map_err(PromoCodeError::from)
    }

    pub async fn activate_promo_code(&self, id: &str) -> Result<PromoCode, PromoCodeError> {
        self.set_promo_status(id, PromoStatus::Active).await
    }

    pub async fn deactivate_promo_code(&self, id: &str) -> Result<PromoCode, PromoCodeError> {
        self.set_promo_status(id, PromoStatus::Inactive).await
    }

    #[instrument(skip(self))]
    async fn set_promo_status(
        &self,
        id: &str,
        status: PromoStatus,
    ) -> Result<PromoCode, PromoCodeError> {
        debug!("Sending request");
        let operation = crud::change_status(&self.inner.current(), id, status)?;
        self.inner
            .dispatch(operation)
            .await
            .map_err(PromoCodeError::from)?
            .into_entity()
            .ok_or_else(|| PromoCodeError::NotFound(id.to_string()))
    }
}
