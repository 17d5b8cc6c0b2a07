use super::escape;
use super::layout::{self, CREATE_URL};
use crate::config::Config;
use crate::db::DbCar;
use crate::middleware::car_submission::IMG_FIELD;
use crate::service::car_form::{CarForm, IMG_CLEAR_FIELD};

pub fn list_page(cars: &[DbCar], flashes: &[String], cfg: &Config) -> String {
    let mut body = String::from("<h1>Cars</h1>\n");
    if cars.is_empty() {
        body.push_str("<p class=\"empty\">No cars yet.</p>\n");
    } else {
        body.push_str("<ul class=\"car-list\">\n");
        for car in cars {
            body.push_str(&format!(
                "<li>\n<a href=\"{}\">{} {}</a> ({})\n",
                layout::detail_url(car.id),
                escape(&car.make),
                escape(&car.model),
                car.year
            ));
            body.push_str(&image_tag(car, cfg));
            body.push_str("</li>\n");
        }
        body.push_str("</ul>\n");
    }
    layout::page("Cars", flashes, &body)
}

pub fn detail_page(car: &DbCar, cfg: &Config) -> String {
    let body = format!(
        "<h1>{make} {model}</h1>\n\
         <dl>\n<dt>Make</dt><dd>{make}</dd>\n<dt>Model</dt><dd>{model}</dd>\n<dt>Year</dt><dd>{year}</dd>\n</dl>\n\
         {img}\
         <p>\n<a href=\"{edit}\">Edit</a>\n<a href=\"{delete}\">Delete</a>\n</p>\n",
        make = escape(&car.make),
        model = escape(&car.model),
        year = car.year,
        img = image_tag(car, cfg),
        edit = layout::update_url(car.id),
        delete = layout::delete_url(car.id),
    );
    layout::page(&format!("{} {}", car.make, car.model), &[], &body)
}

pub fn create_page(form: &CarForm) -> String {
    let mut body = String::from("<h1>Add a car</h1>\n");
    body.push_str(&form_markup(CREATE_URL, form, None, "Create"));
    layout::page("Add a car", &[], &body)
}

/// Edit form for `car`. `form` carries either the stored values or a rejected submission.
pub fn update_page(car: &DbCar, form: &CarForm, cfg: &Config) -> String {
    let mut body = format!(
        "<h1>Edit {} {}</h1>\n",
        escape(&car.make),
        escape(&car.model)
    );
    let current = car
        .img
        .as_deref()
        .map(|img| (img, cfg.media_url_for(img)));
    body.push_str(&form_markup(
        &layout::update_url(car.id),
        form,
        current,
        "Save",
    ));
    layout::page(&format!("Edit {} {}", car.make, car.model), &[], &body)
}

fn image_tag(car: &DbCar, cfg: &Config) -> String {
    match car.img.as_deref() {
        Some(img) => format!(
            "<img src=\"{}\" alt=\"{} {}\">\n",
            escape(&cfg.media_url_for(img)),
            escape(&car.make),
            escape(&car.model)
        ),
        None => String::new(),
    }
}

fn form_markup(
    action: &str,
    form: &CarForm,
    current_img: Option<(&str, String)>,
    submit_label: &str,
) -> String {
    let mut out = format!(
        "<form method=\"post\" action=\"{}\" enctype=\"multipart/form-data\">\n",
        escape(action)
    );

    out.push_str(&text_input(form, "make", "Make", "text", &form.make));
    out.push_str(&text_input(form, "model", "Model", "text", &form.model));
    out.push_str(&text_input(form, "year", "Year", "number", &form.year));

    out.push_str("<p>\n<label for=\"id_img\">Image</label>\n");
    if let Some((path, url)) = current_img {
        out.push_str(&format!(
            "Currently: <a href=\"{}\">{}</a>\n\
             <input type=\"checkbox\" name=\"{IMG_CLEAR_FIELD}\" id=\"id_img_clear\">\n\
             <label for=\"id_img_clear\">Clear</label>\n",
            escape(&url),
            escape(path)
        ));
    }
    out.push_str(&format!(
        "<input type=\"file\" name=\"{IMG_FIELD}\" id=\"id_img\" accept=\"image/*\">\n"
    ));
    out.push_str(&error_list(form, IMG_FIELD));
    out.push_str("</p>\n");

    out.push_str(&format!(
        "<button type=\"submit\">{}</button>\n</form>\n",
        escape(submit_label)
    ));
    out
}

fn text_input(form: &CarForm, name: &str, label: &str, kind: &str, value: &str) -> String {
    format!(
        "<p>\n<label for=\"id_{name}\">{label}</label>\n\
         <input type=\"{kind}\" name=\"{name}\" id=\"id_{name}\" value=\"{value}\" required>\n\
         {errors}</p>\n",
        value = escape(value),
        errors = error_list(form, name),
    )
}

fn error_list(form: &CarForm, field: &str) -> String {
    let messages = form.errors.get(field);
    if messages.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"errorlist\">\n");
    for message in messages {
        out.push_str(&format!("<li>{}</li>\n", escape(message)));
    }
    out.push_str("</ul>\n");
    out
}
