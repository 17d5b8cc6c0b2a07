use file_format::FileFormat;
use image::ImageFormat;
use std::collections::BTreeMap;

use crate::db::DbCar;
use crate::middleware::car_submission::{CarSubmission, IMG_FIELD, UploadedFile};

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_WHOLE_NUMBER: &str = "Enter a whole number.";
pub const MSG_INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const MSG_FILE_AND_CLEAR: &str =
    "Please either submit a file or check the clear checkbox, not both.";

/// Checkbox that drops the stored image on update.
pub const IMG_CLEAR_FIELD: &str = "img-clear";

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<&'static str>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_default().push(message);
    }

    pub fn get(&self, field: &str) -> &[&'static str] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// What a valid submission does to the stored image.
#[derive(Debug, Clone)]
pub enum ImageChange {
    Keep,
    Clear,
    Replace {
        file: UploadedFile,
        extension: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct ValidatedCar {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub img: ImageChange,
}

/// Car form state: the raw values as submitted plus any validation errors.
#[derive(Debug, Clone, Default)]
pub struct CarForm {
    pub make: String,
    pub model: String,
    pub year: String,
    pub img: Option<UploadedFile>,
    pub clear_img: bool,
    pub errors: FormErrors,
}

impl CarForm {
    /// Form prefilled from a stored record.
    pub fn from_car(car: &DbCar) -> Self {
        Self {
            make: car.make.clone(),
            model: car.model.clone(),
            year: car.year.to_string(),
            ..Self::default()
        }
    }

    pub fn from_submission(mut submission: CarSubmission) -> Self {
        let mut take = |name: &str| submission.fields.remove(name).unwrap_or_default();
        let make = take("make");
        let model = take("model");
        let year = take("year");
        let clear_img = is_checked(&take(IMG_CLEAR_FIELD));
        Self {
            make,
            model,
            year,
            img: submission.file,
            clear_img,
            errors: FormErrors::default(),
        }
    }

    /// Validate the submitted values. On failure the form comes back with its errors filled in.
    pub fn validate(mut self) -> Result<ValidatedCar, Self> {
        let mut errors = FormErrors::default();

        let make = required_text(&self.make, "make", &mut errors);
        let model = required_text(&self.model, "model", &mut errors);

        let year = match self.year.trim() {
            "" => {
                errors.add("year", MSG_REQUIRED);
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(year) => Some(year),
                Err(_) => {
                    errors.add("year", MSG_WHOLE_NUMBER);
                    None
                }
            },
        };

        let img = match (self.img.as_ref(), self.clear_img) {
            (Some(_), true) => {
                errors.add(IMG_FIELD, MSG_FILE_AND_CLEAR);
                None
            }
            (Some(file), false) => match verify_image(&file.bytes) {
                Some(extension) => Some(ImageChange::Replace {
                    file: file.clone(),
                    extension,
                }),
                None => {
                    errors.add(IMG_FIELD, MSG_INVALID_IMAGE);
                    None
                }
            },
            (None, true) => Some(ImageChange::Clear),
            (None, false) => Some(ImageChange::Keep),
        };

        match (make, model, year, img) {
            (Some(make), Some(model), Some(year), Some(img)) => {
                Ok(ValidatedCar {
                    make,
                    model,
                    year,
                    img,
                })
            }
            _ => {
                self.errors = errors;
                Err(self)
            }
        }
    }
}

fn required_text(raw: &str, field: &'static str, errors: &mut FormErrors) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, MSG_REQUIRED);
        return None;
    }
    Some(value.to_string())
}

fn is_checked(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "on" | "1" | "true" | "yes"
    )
}

/// Detect the image format and make sure the file fully decodes.
/// Returns the canonical extension to store the upload under.
pub fn verify_image(bytes: &[u8]) -> Option<&'static str> {
    let (extension, format) = match FileFormat::from_bytes(bytes) {
        FileFormat::JointPhotographicExpertsGroup => ("jpg", ImageFormat::Jpeg),
        FileFormat::PortableNetworkGraphics => ("png", ImageFormat::Png),
        FileFormat::GraphicsInterchangeFormat => ("gif", ImageFormat::Gif),
        FileFormat::Webp => ("webp", ImageFormat::WebP),
        FileFormat::WindowsBitmap => ("bmp", ImageFormat::Bmp),
        _ => return None,
    };
    image::load_from_memory_with_format(bytes, format).ok()?;
    Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    const PNG_1X1: &[u8] = b"\x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d\x49\x48\x44\x52\x00\x00\x00\x01\x00\x00\x00\x01\x08\x02\x00\x00\x00\x90\x77\x53\xde\x00\x00\x00\x0c\x49\x44\x41\x54\x78\x9c\x63\xf8\xcf\xc0\x00\x00\x03\x01\x01\x00\xc9\xfe\x92\xef\x00\x00\x00\x00\x49\x45\x4e\x44\xae\x42\x60\x82";

    fn submission(pairs: &[(&str, &str)]) -> CarSubmission {
        CarSubmission {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: Bytes::from_static(PNG_1X1),
        }
    }

    #[test]
    fn valid_submission_is_trimmed() {
        let form = CarForm::from_submission(submission(&[
            ("make", " Jeep "),
            ("model", "Wrangler"),
            ("year", " 2018"),
        ]));
        let car = form.validate().expect("form should be valid");
        assert_eq!(car.make, "Jeep");
        assert_eq!(car.model, "Wrangler");
        assert_eq!(car.year, 2018);
        assert!(matches!(car.img, ImageChange::Keep));
    }

    #[test]
    fn missing_year_keeps_submitted_values() {
        let form = CarForm::from_submission(submission(&[("make", "Jeep"), ("model", "Wrangler")]));
        let form = form.validate().expect_err("year is required");
        assert_eq!(form.errors.get("year"), [MSG_REQUIRED]);
        assert!(form.errors.get("make").is_empty());
        assert_eq!(form.make, "Jeep");
        assert_eq!(form.model, "Wrangler");
    }

    #[test]
    fn blank_text_and_bad_year_are_rejected() {
        let form = CarForm::from_submission(submission(&[
            ("make", "   "),
            ("year", "twenty"),
        ]));
        let form = form.validate().expect_err("form should be invalid");
        assert_eq!(form.errors.get("make"), [MSG_REQUIRED]);
        assert_eq!(form.errors.get("model"), [MSG_REQUIRED]);
        assert_eq!(form.errors.get("year"), [MSG_WHOLE_NUMBER]);
    }

    #[test]
    fn image_upload_is_detected() {
        let mut sub = submission(&[("make", "BMW"), ("model", "535"), ("year", "2015")]);
        sub.file = Some(png("photo.jpeg"));
        let car = CarForm::from_submission(sub).validate().expect("valid");
        match car.img {
            ImageChange::Replace { extension, .. } => assert_eq!(extension, "png"),
            other => panic!("unexpected image change: {other:?}"),
        }
    }

    #[test]
    fn non_image_upload_is_rejected() {
        let mut sub = submission(&[("make", "BMW"), ("model", "535"), ("year", "2015")]);
        sub.file = Some(UploadedFile {
            filename: "notes.jpg".to_string(),
            bytes: Bytes::from_static(b"plain text"),
        });
        let form = CarForm::from_submission(sub).validate().expect_err("invalid");
        assert_eq!(form.errors.get(IMG_FIELD), [MSG_INVALID_IMAGE]);
    }

    #[test]
    fn clear_checkbox_conflicts_with_upload() {
        let mut sub = submission(&[
            ("make", "BMW"),
            ("model", "535"),
            ("year", "2015"),
            (IMG_CLEAR_FIELD, "on"),
        ]);
        let car = CarForm::from_submission(sub.clone()).validate().expect("valid");
        assert!(matches!(car.img, ImageChange::Clear));

        sub.file = Some(png("a.png"));
        let form = CarForm::from_submission(sub).validate().expect_err("invalid");
        assert_eq!(form.errors.get(IMG_FIELD), [MSG_FILE_AND_CLEAR]);
    }

    fn with_file(bytes: &'static [u8]) -> CarSubmission {
        let mut sub = submission(&[("make", "BMW"), ("model", "535"), ("year", "2015")]);
        sub.file = Some(UploadedFile {
            filename: "photo.bmp".to_string(),
            bytes: Bytes::from_static(bytes),
        });
        sub
    }

    #[test]
    fn text_starting_with_bm_is_not_an_image() {
        let form = CarForm::from_submission(with_file(b"BMW 535 brochure, plain text"))
            .validate()
            .expect_err("text is not an image");
        assert_eq!(form.errors.get(IMG_FIELD), [MSG_INVALID_IMAGE]);
    }

    #[test]
    fn truncated_png_is_rejected() {
        let form = CarForm::from_submission(with_file(b"\x89PNG\r\n\x1a\n"))
            .validate()
            .expect_err("bare signature does not decode");
        assert_eq!(form.errors.get(IMG_FIELD), [MSG_INVALID_IMAGE]);

        let form = CarForm::from_submission(with_file(&PNG_1X1[..40]))
            .validate()
            .expect_err("cut-off image data does not decode");
        assert_eq!(form.errors.get(IMG_FIELD), [MSG_INVALID_IMAGE]);
    }
}
