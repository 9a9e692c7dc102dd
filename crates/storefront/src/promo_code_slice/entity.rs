use crate::api::ResourceApi;
use crate::model::PromoCode;
use slice_framework::SliceEntity;

impl SliceEntity for PromoCode {
    type Id = String;
    type Summary = ();
    type Context = ResourceApi<PromoCode>;

    fn id(&self) -> &String {
        &self.id
    }
}
