//! Contact form that receives the builder hand-off.
use crate::components::custom_select::{CustomSelect, SelectOption};
use crate::dom;
use meridian_builder::ContactHandoff;
use meridian_builder::handoff::{MESSAGE_FIELD, STATE_FIELD, TOPIC_FIELD};
use once_cell::sync::Lazy;
use regex::Regex;
use yew::prelude::*;

static EMAIL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Section id the builder scrolls to when sending.
pub const CONTACT_SECTION_ID: &str = "contact";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactProblem {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please write a message.")]
    MissingMessage,
    #[error("Please select a topic.")]
    MissingTopic,
}

/// Current field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub topic: String,
    pub message: String,
    pub experience_builder: String,
}

impl ContactDraft {
    /// Copy the builder hand-off into the draft. The topic only changes when
    /// the hand-off names one.
    pub fn apply_handoff(&mut self, handoff: &ContactHandoff) {
        self.experience_builder.clone_from(&handoff.experience_builder);
        self.message.clone_from(&handoff.message);
        if let Some(topic) = &handoff.topic {
            self.topic.clone_from(topic);
        }
    }

    /// Trim name and email, then report the first problem in field order.
    ///
    /// # Errors
    /// Returns the first field that blocks submission.
    pub fn validate(&mut self) -> Result<(), ContactProblem> {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        if self.name.is_empty() {
            return Err(ContactProblem::MissingName);
        }
        let email_ok = EMAIL
            .as_ref()
            .is_some_and(|re| re.is_match(&self.email));
        if !email_ok {
            return Err(ContactProblem::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            return Err(ContactProblem::MissingMessage);
        }
        if self.topic.is_empty() {
            return Err(ContactProblem::MissingTopic);
        }
        Ok(())
    }
}

/// One press of "Send to our team". The sequence differs between presses,
/// so sending an unchanged builder state still refills the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffDelivery {
    pub sequence: u32,
    pub handoff: ContactHandoff,
}

impl HandoffDelivery {
    #[must_use]
    pub const fn new(sequence: u32, handoff: ContactHandoff) -> Self {
        Self { sequence, handoff }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub topics: Vec<String>,
    #[prop_or_default]
    pub handoff: Option<HandoffDelivery>,
    #[prop_or(AttrValue::from("/contact"))]
    pub action: AttrValue,
}

#[function_component(ContactForm)]
pub fn contact_form(p: &Props) -> Html {
    let draft = use_state(ContactDraft::default);
    let problem = use_state(|| None::<ContactProblem>);

    {
        let draft = draft.clone();
        let problem = problem.clone();
        use_effect_with(p.handoff.clone(), move |delivery| {
            if let Some(delivery) = delivery {
                let mut next = (*draft).clone();
                next.apply_handoff(&delivery.handoff);
                draft.set(next);
                problem.set(None);
                if let Err(err) = dom::focus(&format!("#{CONTACT_SECTION_ID} input[name=\"name\"]")) {
                    log::debug!("name field not focused: {err}");
                }
            }
        });
    }

    let edit = |update: fn(&mut ContactDraft, String)| {
        let draft = draft.clone();
        Callback::from(move |value: String| {
            let mut next = (*draft).clone();
            update(&mut next, value);
            draft.set(next);
        })
    };
    let input_value = |cb: Callback<String>| {
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                cb.emit(input.value());
            } else if let Some(area) = e.target_dyn_into::<web_sys::HtmlTextAreaElement>() {
                cb.emit(area.value());
            }
        })
    };
    let on_name = input_value(edit(|d, v| d.name = v));
    let on_email = input_value(edit(|d, v| d.email = v));
    let on_message = input_value(edit(|d, v| d.message = v));
    let on_topic = {
        let problem = problem.clone();
        let set_topic = edit(|d, v| d.topic = v);
        Callback::from(move |value: String| {
            if problem.as_ref() == Some(&ContactProblem::MissingTopic) {
                problem.set(None);
            }
            set_topic.emit(value);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let problem = problem.clone();
        Callback::from(move |e: SubmitEvent| {
            let mut next = (*draft).clone();
            let result = next.validate();
            draft.set(next);
            match result {
                Ok(()) => problem.set(None),
                Err(found) => {
                    e.prevent_default();
                    problem.set(Some(found));
                    if found == ContactProblem::MissingTopic
                        && let Err(err) = dom::focus(&format!("#{TOPIC_FIELD}__btn"))
                    {
                        log::debug!("topic button not focused: {err}");
                    }
                }
            }
        })
    };

    let options: Vec<SelectOption> = p
        .topics
        .iter()
        .map(|t| SelectOption::plain(t.clone()))
        .collect();
    let topic_error = (*problem == Some(ContactProblem::MissingTopic))
        .then(|| AttrValue::from(ContactProblem::MissingTopic.to_string()));
    let form_error = problem
        .filter(|found| *found != ContactProblem::MissingTopic)
        .map(|found| found.to_string());

    html! {
        <section id={CONTACT_SECTION_ID} class="contact">
            <form class="contactForm" method="post" action={p.action.clone()} novalidate=true onsubmit={on_submit}>
                <div class="formRow">
                    <label for="contact-name">{ "Name" }</label>
                    <input id="contact-name" type="text" name="name" required=true value={draft.name.clone()} oninput={on_name} />
                </div>
                <div class="formRow">
                    <label for="contact-email">{ "Email" }</label>
                    <input id="contact-email" type="email" name="email" required=true value={draft.email.clone()} oninput={on_email} />
                </div>
                <div class="formRow">
                    <label for={TOPIC_FIELD}>{ "Topic" }</label>
                    <CustomSelect
                        id={TOPIC_FIELD}
                        name={TOPIC_FIELD}
                        {options}
                        value={AttrValue::from(draft.topic.clone())}
                        onchange={on_topic}
                        placeholder={AttrValue::from("Choose a topic")}
                        required=true
                        error={topic_error}
                    />
                </div>
                <div class="formRow">
                    <label for="contact-message">{ "Message" }</label>
                    <textarea id="contact-message" name={MESSAGE_FIELD} rows="8" required=true value={draft.message.clone()} oninput={on_message} />
                </div>
                <input type="hidden" name={STATE_FIELD} value={draft.experience_builder.clone()} />
                if let Some(text) = form_error {
                    <p class="contactForm__error" role="alert">{ text }</p>
                }
                <button type="submit" class="btn btn--primary">{ "Send request" }</button>
            </form>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use meridian_builder::{CatalogLoader, EmbeddedCatalogs, ExperienceConfig};
    use yew::LocalServerRenderer;

    fn filled() -> ContactDraft {
        ContactDraft {
            name: "  Ana  ".into(),
            email: " ana@example.com ".into(),
            topic: "Training Camp".into(),
            message: "Hello".into(),
            experience_builder: String::new(),
        }
    }

    #[test]
    fn validation_trims_and_reports_in_field_order() {
        let mut draft = filled();
        assert_eq!(draft.validate(), Ok(()));
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.email, "ana@example.com");

        let mut draft = ContactDraft {
            email: "not-an-email".into(),
            ..filled()
        };
        assert_eq!(draft.validate(), Err(ContactProblem::InvalidEmail));

        let mut draft = ContactDraft {
            topic: String::new(),
            ..filled()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err, ContactProblem::MissingTopic);
        assert_eq!(err.to_string(), "Please select a topic.");
    }

    #[test]
    fn handoff_fills_message_state_and_topic() {
        let catalog = EmbeddedCatalogs.load_builder_catalog().unwrap();
        let handoff = ContactHandoff::prepare(
            &ExperienceConfig::default(),
            &catalog,
            &catalog.contact_topics,
        )
        .unwrap();
        let mut draft = ContactDraft::default();
        draft.apply_handoff(&handoff);
        assert_eq!(draft.topic, "Training Camp");
        assert!(draft.message.starts_with("Hi Meridian Padel,"));
        assert!(draft.experience_builder.contains("\"group\":4"));

        let mut keep = ContactDraft {
            topic: "Partnership".into(),
            ..ContactDraft::default()
        };
        keep.apply_handoff(&ContactHandoff {
            topic: None,
            ..handoff
        });
        assert_eq!(keep.topic, "Partnership");
    }

    #[test]
    fn repeated_send_refills_an_edited_form() {
        let catalog = EmbeddedCatalogs.load_builder_catalog().unwrap();
        let handoff = ContactHandoff::prepare(
            &ExperienceConfig::default(),
            &catalog,
            &catalog.contact_topics,
        )
        .unwrap();
        let first = HandoffDelivery::new(1, handoff.clone());
        let second = HandoffDelivery::new(2, handoff);
        assert_ne!(first, second);

        let mut draft = ContactDraft::default();
        draft.apply_handoff(&first.handoff);
        draft.message.clear();
        draft.topic = "Partnership".into();
        draft.experience_builder.clear();
        draft.apply_handoff(&second.handoff);
        assert!(draft.message.starts_with("Hi Meridian Padel,"));
        assert_eq!(draft.topic, "Training Camp");
        assert!(draft.experience_builder.contains("\"group\":4"));
    }

    #[test]
    fn form_renders_fields_and_hidden_state() {
        let props = Props {
            topics: vec!["General enquiry".into(), "Training Camp".into()],
            handoff: None,
            action: "/contact".into(),
        };
        let html = block_on(LocalServerRenderer::<ContactForm>::with_props(props).render());
        assert!(html.contains("id=\"contact\""));
        assert!(html.contains("name=\"experience_builder\""));
        assert!(html.contains("name=\"message\""));
        assert!(html.contains("Choose a topic"));
        assert!(html.contains("data-value=\"Training Camp\""));
    }
}
