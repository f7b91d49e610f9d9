use crate::endpoints::activities::ListActivities;

#[derive(Default)]
pub struct ActivityRepository;

impl ActivityRepository {
    pub fn new() -> Self {
        Self
    }

    /// Activities of the athlete owning the access token, most recent first.
    pub fn list(&self) -> ListActivities {
        ListActivities::new()
    }
}
