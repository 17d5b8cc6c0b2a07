use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use crate::db::{DbCar, NewCar};
use crate::middleware::car_submission::CarSubmission;
use crate::middleware::flash;
use crate::service::car_form::{CarForm, ImageChange};
use crate::service::media;
use crate::views::{self, layout::LIST_URL};
use crate::{CarlotError, router::CarlotState};

/// 302 back to the listing.
pub fn redirect_to_list() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, LIST_URL)]).into_response()
}

/// GET / -> the listing.
pub async fn index() -> Response {
    redirect_to_list()
}

/// GET /cars -> every car, in store order.
pub async fn car_list(
    State(state): State<CarlotState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, CarlotError> {
    let cars = state.storage.list_all().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        Html(views::cars::list_page(&cars, &flashes, &state.config)),
    ))
}

/// GET /cars/{id}
pub async fn car_detail(
    State(state): State<CarlotState>,
    Path(car_id): Path<i64>,
) -> Result<Html<String>, CarlotError> {
    let car = state.storage.get_by_id(car_id).await?;
    Ok(Html(views::cars::detail_page(&car, &state.config)))
}

/// GET /cars/new
pub async fn car_create_form() -> Html<String> {
    Html(views::cars::create_page(&CarForm::default()))
}

/// POST /cars/new -> insert and redirect, or re-render the form with errors.
pub async fn car_create(
    State(state): State<CarlotState>,
    jar: CookieJar,
    submission: CarSubmission,
) -> Result<Response, CarlotError> {
    let valid = match CarForm::from_submission(submission).validate() {
        Ok(valid) => valid,
        Err(form) => {
            debug!(errors = ?form.errors, "car create rejected");
            return Ok(Html(views::cars::create_page(&form)).into_response());
        }
    };

    let stored = store_image(&state, valid.img, None).await?;
    let inserted = state
        .storage
        .insert(NewCar {
            make: valid.make,
            model: valid.model,
            year: valid.year,
            img: stored.column,
        })
        .await;
    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            discard_upload(&state, stored.fresh_upload).await;
            return Err(e);
        }
    };

    info!(id, "car created");
    Ok((flash::push(jar, "created."), redirect_to_list()).into_response())
}

/// GET /cars/{id}/edit
pub async fn car_update_form(
    State(state): State<CarlotState>,
    Path(car_id): Path<i64>,
) -> Result<Html<String>, CarlotError> {
    let car = state.storage.get_by_id(car_id).await?;
    let form = CarForm::from_car(&car);
    Ok(Html(views::cars::update_page(&car, &form, &state.config)))
}

/// POST /cars/{id}/edit -> update in place and redirect, or re-render with errors.
pub async fn car_update(
    State(state): State<CarlotState>,
    Path(car_id): Path<i64>,
    jar: CookieJar,
    submission: CarSubmission,
) -> Result<Response, CarlotError> {
    let car = state.storage.get_by_id(car_id).await?;

    let valid = match CarForm::from_submission(submission).validate() {
        Ok(valid) => valid,
        Err(form) => {
            debug!(id = car_id, errors = ?form.errors, "car update rejected");
            return Ok(Html(views::cars::update_page(&car, &form, &state.config)).into_response());
        }
    };

    let DbCar { id, img, .. } = car;
    let stored = store_image(&state, valid.img, img).await?;
    let updated = state
        .storage
        .update_by_id(
            id,
            NewCar {
                make: valid.make,
                model: valid.model,
                year: valid.year,
                img: stored.column,
            },
        )
        .await;
    if let Err(e) = updated {
        discard_upload(&state, stored.fresh_upload).await;
        return Err(e);
    }

    info!(id, "car updated");
    Ok((flash::push(jar, "updated."), redirect_to_list()).into_response())
}

/// GET|POST /cars/{id}/delete -> removes the car immediately.
pub async fn car_delete(
    State(state): State<CarlotState>,
    Path(car_id): Path<i64>,
    jar: CookieJar,
) -> Result<Response, CarlotError> {
    let car = state.storage.get_by_id(car_id).await?;
    state.storage.delete_by_id(car.id).await?;

    info!(id = car.id, make = %car.make, model = %car.model, "car deleted");
    Ok((flash::push(jar, "deleted."), redirect_to_list()).into_response())
}

struct StoredImage {
    /// Value for the `img` column.
    column: Option<String>,
    /// Set when this request wrote a new file.
    fresh_upload: Option<String>,
}

/// Resolve the `img` column after a valid submission.
async fn store_image(
    state: &CarlotState,
    change: ImageChange,
    current: Option<String>,
) -> Result<StoredImage, CarlotError> {
    match change {
        ImageChange::Keep => Ok(StoredImage {
            column: current,
            fresh_upload: None,
        }),
        ImageChange::Clear => Ok(StoredImage {
            column: None,
            fresh_upload: None,
        }),
        ImageChange::Replace { file, extension } => {
            let path = media::store_upload(&state.config.media_root, &file, extension).await?;
            Ok(StoredImage {
                column: Some(path.clone()),
                fresh_upload: Some(path),
            })
        }
    }
}

async fn discard_upload(state: &CarlotState, fresh_upload: Option<String>) {
    if let Some(path) = fresh_upload {
        media::remove_upload(&state.config.media_root, &path).await;
    }
}
