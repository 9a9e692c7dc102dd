use crate::api::ResourceApi;
use crate::model::Category;
use slice_framework::SliceEntity;

impl SliceEntity for Category {
    type Id = String;
    type Summary = ();
    type Context = ResourceApi<Category>;

    fn id(&self) -> &String {
        &self.id
    }
}
