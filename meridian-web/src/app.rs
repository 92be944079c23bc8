use crate::catalog::builder_catalog;
use crate::components::contact_form::{ContactForm, HandoffDelivery};
use crate::components::custom_select::SelectProvider;
use crate::components::experience_builder::ExperienceBuilderPanel;
use crate::components::itinerary::Itinerary;
use crate::paths;
use meridian_builder::ContactHandoff;
use std::rc::Rc;
use yew::prelude::*;

/// Page root: the builder, the itinerary that follows it and the contact
/// form that receives its hand-off.
#[function_component(App)]
pub fn app() -> Html {
    let catalog = use_memo((), |()| builder_catalog());
    let handoff = use_state(|| None::<HandoffDelivery>);
    let sends = use_mut_ref(|| 0_u32);

    let on_send = {
        let handoff = handoff.clone();
        Callback::from(move |next: ContactHandoff| {
            let sequence = {
                let mut count = sends.borrow_mut();
                *count = count.wrapping_add(1);
                *count
            };
            handoff.set(Some(HandoffDelivery::new(sequence, next)));
        })
    };
    let topics = catalog.contact_topics.clone();

    html! {
        <SelectProvider>
            <header class="siteHeader">
                <img class="siteHeader__mark" src={paths::asset_path("assets/img/meridian-mark.svg")} alt="" />
                <span class="siteHeader__name">{ "Meridian Padel" }</span>
            </header>
            <main id="main">
                <ExperienceBuilderPanel catalog={Rc::clone(&catalog)} {on_send} />
                <Itinerary />
                <ContactForm {topics} handoff={(*handoff).clone()} />
            </main>
        </SelectProvider>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn page_renders_builder_itinerary_and_contact() {
        let html = block_on(LocalServerRenderer::<App>::new().render());
        assert!(html.contains("id=\"experience-builder\""));
        assert!(html.contains("data-itinerary=\"\""));
        assert!(html.contains("id=\"contact\""));
        assert!(html.contains("assets/img/meridian-mark.svg"));
    }
}
