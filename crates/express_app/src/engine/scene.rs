// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene object registry and ambient parameters.

use express_train::ObjectId;
use indexmap::IndexMap;

/// Named scene objects plus the ambient wind parameter.
pub(crate) struct SceneRegistry {
    objects: IndexMap<String, ObjectId>,
    next_id: u32,
    wind: f32,
}

impl SceneRegistry {
    pub(crate) fn new() -> Self {
        Self {
            objects: IndexMap::new(),
            next_id: 1,
            wind: 0.0,
        }
    }

    /// Register an object name, returning the existing handle if the
    /// name is already known.
    pub(crate) fn register(&mut self, name: &str) -> ObjectId {
        if let Some(&id) = self.objects.get(name) {
            return id;
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(name.to_owned(), id);
        id
    }

    pub(crate) fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects.get(name).copied()
    }

    pub(crate) fn set_wind(&mut self, value: f32) {
        self.wind = value;
    }

    pub(crate) fn wind(&self) -> f32 {
        self.wind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut scene = SceneRegistry::new();
        let a = scene.register("loco.armature");
        let b = scene.register("loco.armature");
        assert_eq!(a, b);
        assert_eq!(scene.find("loco.armature"), Some(a));
        assert_eq!(scene.find("missing"), None);
    }
}
