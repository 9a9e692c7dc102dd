use crate::api::ResourceApi;
use crate::model::Product;
use slice_framework::SliceEntity;

impl SliceEntity for Product {
    type Id = String;
    type Summary = ();
    type Context = ResourceApi<Product>;

    fn id(&self) -> &String {
        &self.id
    }
}
