use crate::api::ResourceApi;
use crate::model::User;
use slice_framework::SliceEntity;

impl SliceEntity for User {
    type Id = String;
    type Summary = ();
    type Context = ResourceApi<User>;

    fn id(&self) -> &String {
        &self.id
    }
}
