use std::path::Path;

/// Remote folder that receives the stills of `video_key`: the stills prefix
/// followed by the video's base name with its extension stripped.
///
/// Videos sharing a base name in different folders share a stills folder.
pub fn stills_folder(stills_prefix: &str, video_key: &str) -> String {
    let stem = Path::new(video_key)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}/", stills_prefix, stem)
}

pub fn still_key(stills_prefix: &str, video_key: &str, file_name: &str) -> String {
    format!("{}{}", stills_folder(stills_prefix, video_key), file_name)
}
