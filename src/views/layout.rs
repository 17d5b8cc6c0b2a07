use super::escape;

pub const LIST_URL: &str = "/cars";
pub const CREATE_URL: &str = "/cars/new";

pub fn detail_url(id: i64) -> String {
    format!("/cars/{id}")
}

pub fn update_url(id: i64) -> String {
    format!("/cars/{id}/edit")
}

pub fn delete_url(id: i64) -> String {
    format!("/cars/{id}/delete")
}

/// Wrap a rendered body in the shared document shell.
pub fn page(title: &str, flashes: &[String], body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 512);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{} | Car Lot</title>\n", escape(title)));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!(
        "<nav>\n<a href=\"{LIST_URL}\">All cars</a>\n<a href=\"{CREATE_URL}\">Add a car</a>\n</nav>\n"
    ));
    if !flashes.is_empty() {
        out.push_str("<ul class=\"messages\">\n");
        for message in flashes {
            out.push_str(&format!("<li class=\"success\">{}</li>\n", escape(message)));
        }
        out.push_str("</ul>\n");
    }
    out.push_str("<main>\n");
    out.push_str(body);
    out.push_str("</main>\n</body>\n</html>\n");
    out
}
