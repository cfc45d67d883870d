use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Load any stored object by its full id
    pub fn cat_file(&self, object_id: &str) -> crate::Result<ObjectBox> {
        let object_id = ObjectId::try_parse(object_id)?;

        Ok(self.database().parse_object(&object_id)?)
    }
}
