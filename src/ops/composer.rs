use tracing::info;

use super::form::IdeaForm;
use super::list::IdeaList;
use super::{Call, Effect, Origin, Reply};

/// Form and list side by side. A saved form refreshes the list; every
/// reply goes back to whichever of the two issued it.
#[derive(Debug, Default)]
pub struct Composer {
    pub form: IdeaForm,
    pub list: IdeaList,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial load of the list
    pub fn start(&mut self) -> Vec<Effect> {
        vec![Effect::Call(self.list.init())]
    }

    pub fn submit_form(&mut self) -> Option<Call> {
        self.form.submit()
    }

    pub fn apply(&mut self, reply: Reply) -> Vec<Effect> {
        let effects = match reply.origin {
            Origin::FormCreate => self.form.on_created(reply.result),
            origin => self.list.apply(origin, reply.result),
        };
        self.rewire(effects)
    }

    /// Turn the form's saved signal into a list refresh
    fn rewire(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        effects
            .into_iter()
            .map(|effect| match effect {
                Effect::Saved => {
                    info!("idea saved, refreshing list");
                    Effect::Call(self.list.refresh())
                }
                other => other,
            })
            .collect()
    }
}
