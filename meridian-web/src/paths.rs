//! Static asset URLs under the deployment base path.
//!
//! `PUBLIC_URL` is read at compile time (e.g. `/experience` when the site is
//! served from a subdirectory). Without it, paths are root-anchored.

/// URL of a file under `static/`.
#[must_use]
pub fn asset_path(relative: &str) -> String {
    join_base(option_env!("PUBLIC_URL").unwrap_or(""), relative)
}

fn join_base(base: &str, relative: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    format!("{base}/{}", relative.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_anchored_without_base() {
        assert_eq!(asset_path("assets/img/meridian-mark.svg"), "/assets/img/meridian-mark.svg");
        assert_eq!(join_base("", "/assets/css/builder.css"), "/assets/css/builder.css");
    }

    #[test]
    fn prefixed_with_trimmed_base() {
        assert_eq!(
            join_base("/experience/", "assets/img/meridian-mark.svg"),
            "/experience/assets/img/meridian-mark.svg"
        );
        assert_eq!(join_base(" /padel ", "/x.css"), "/padel/x.css");
    }
}
