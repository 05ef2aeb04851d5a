use url::Url;

use crate::model::CourseId;

/// Builds the learning-environment link for a course.
///
/// Shape: `{base}/course/{course_id}?token={token}`. The token is opaque here;
/// whoever sealed the email decides its format.
///
/// # Errors
///
/// Returns `url::ParseError` if the base cannot take a path.
pub fn course_launch_url(base: &Url, course_id: &CourseId, token: &str) -> Result<Url, url::ParseError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
        segments.pop_if_empty();
        segments.push("course");
        segments.push(course_id.as_str());
    }
    url.query_pairs_mut().clear().append_pair("token", token);
    Ok(url)
}
