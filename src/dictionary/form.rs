//! The form fragment shared by the dictionary item creation and editing pages.

use maud::{Markup, html};

use crate::{
    dictionary::{DictionaryItemId, DictionaryKind, EntryOption},
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, select_field},
};

/// How the rendered form submits itself.
pub(crate) enum FormMethod {
    Post,
    Put,
}

/// Render the name input and, for kinds with a parent, the parent select.
///
/// `error_message` is rendered above the submit button when non-empty.
pub(crate) fn dictionary_item_form_view(
    kind: DictionaryKind,
    endpoint: &str,
    method: FormMethod,
    name: &str,
    parent_options: &[EntryOption],
    selected_parent: Option<DictionaryItemId>,
    error_message: &str,
    submit_label: &str,
) -> Markup {
    let parent_select = kind.parent_kind().map(|parent_kind| {
        select_field(
            parent_kind.display_name(),
            "parent_id",
            parent_options,
            selected_parent,
            &format!("Select {}", parent_kind.display_name().to_lowercase()),
            true,
        )
    });

    let name_label = format!("{} Name", kind.display_name());

    html! {
        form
            hx-post=[matches!(method, FormMethod::Post).then_some(endpoint)]
            hx-put=[matches!(method, FormMethod::Put).then_some(endpoint)]
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    (name_label)
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder=(name_label)
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(parent_select) = parent_select {
                (parent_select)
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
