use crate::api::ResourceApi;
use crate::model::Favorite;
use slice_framework::SliceEntity;

impl SliceEntity for Favorite {
    type Id = String;
    type Summary = ();
    type Context = ResourceApi<Favorite>;

    fn id(&self) -> &String {
        &self.id
    }
}
