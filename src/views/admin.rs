use maud::{html, Markup};

use crate::{
    db::models::Category,
    models::CategoryDraft,
    names,
    services::ValidationError,
    views::components,
};

fn category_row(category: &Category) -> Markup {
    html! {
        form role="group" hx-post=(names::category_url(category.id)) hx-target="main" {
            input name="name" type="text" required="true" value=(category.name) aria-label="Name";
            input name="slug" type="text" value=(category.slug) aria-label="Slug";
            button."outline" type="submit" { "Rename" }
        }
    }
}

pub fn categories(
    categories: &[Category],
    draft: &CategoryDraft,
    error: Option<&ValidationError>,
) -> Markup {
    html! {
        h1 { "Categories" }
        (components::form_error(error))

        article {
            h4 { "New category" }
            form hx-post=(names::CATEGORIES_URL) hx-target="main" {
                input name="name"
                      type="text"
                      required="true"
                      maxlength=(names::MAX_CATEGORY_NAME_LENGTH)
                      placeholder="Name"
                      value=(draft.name)
                      aria-invalid=[components::invalid(error, "name")];
                input name="slug"
                      type="text"
                      placeholder="Slug (derived from the name when empty)"
                      value=[draft.slug.as_deref()]
                      aria-invalid=[components::invalid(error, "slug")];
                button type="submit" { "Create" }
            }
        }

        @if categories.is_empty() {
            p { "No categories yet." }
        } @else {
            @for category in categories {
                (category_row(category))
            }
        }
    }
}
