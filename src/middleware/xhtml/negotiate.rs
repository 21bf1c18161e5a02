use hyper::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use mime::Mime;
use tracing::{debug, warn};

pub const TEXT_HTML: &str = "text/html";
pub const APPLICATION_XHTML_XML: &str = "application/xhtml+xml";
pub const APPLICATION_XML: &str = "application/xml";

/// 요청 헤더의 `Accept` 목록을 순서대로 읽습니다.
///
/// 헤더가 없으면 빈 목록이고, 파싱할 수 없는 항목은 건너뜁니다.
pub fn parse_accept(headers: &HeaderMap) -> Vec<Mime> {
    parse_accept_values(headers.get_all(ACCEPT))
}

/// 여러 줄의 `Accept` 헤더 값을 미디어 타입 목록으로 풀어냅니다.
///
/// 쉼표는 따옴표 밖에 있을 때만 항목을 나눕니다. 각 항목은 첫 `;` 앞의
/// `type/subtype` 만 남기므로 `q` 같은 파라미터는 결과에 들어가지 않습니다.
/// 콜백이 요청보다 오래 살아야 할 때 복사해 둔 헤더 값으로도 호출할 수 있습니다.
pub fn parse_accept_values<'a, I>(values: I) -> Vec<Mime>
where
    I: IntoIterator<Item = &'a HeaderValue>,
{
    values
        .into_iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(split_list)
        .map(media_type_token)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<Mime>().ok())
        .collect()
}

// 따옴표 안의 쉼표와 `\"` 는 구분자로 보지 않습니다.
fn split_list(value: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (idx, ch) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                entries.push(&value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    entries.push(&value[start..]);
    entries
}

/// 첫 `;` 앞부분에서 앞뒤 공백을 뺀 `type/subtype` 을 반환합니다.
fn media_type_token(entry: &str) -> &str {
    entry.split_once(';').map_or(entry, |(token, _)| token).trim()
}

fn accepts(accept: &[Mime], media_type: &str) -> bool {
    accept.iter().any(|m| m.essence_str().eq_ignore_ascii_case(media_type))
}

/// 현재 Content-Type 과 Accept 목록으로 새 Content-Type 값을 결정합니다.
///
/// 바꿀 필요가 없으면 `None` 을 반환합니다. 미디어 타입 뒤의 내용
/// (`; charset=utf-8`, `;` 앞의 공백 등)은 글자 그대로 유지됩니다.
pub fn negotiate_media_type(content_type: &str, accept: &[Mime]) -> Option<String> {
    let token = media_type_token(content_type);
    let current: Mime = token.parse().ok()?;
    if !current.essence_str().eq_ignore_ascii_case(TEXT_HTML) {
        return None;
    }

    let target = if accepts(accept, APPLICATION_XHTML_XML) {
        APPLICATION_XHTML_XML
    } else if accepts(accept, APPLICATION_XML) {
        APPLICATION_XML
    } else {
        return None;
    };

    let leading = content_type.len() - content_type.trim_start().len();
    let parameters = &content_type[leading + token.len()..];
    Some(format!("{}{}", target, parameters))
}

/// 응답 헤더의 Content-Type 을 협상 결과로 덮어씁니다.
///
/// Content-Type 이 없으면 아무 헤더도 추가하지 않습니다.
pub fn rewrite_content_type(headers: &mut HeaderMap, accept: &[Mime]) {
    let Some(current) = headers.get(CONTENT_TYPE) else {
        return;
    };
    let Ok(current) = current.to_str() else {
        debug!("Content-Type 헤더가 ASCII 가 아니어서 건너뜁니다");
        return;
    };

    let Some(rewritten) = negotiate_media_type(current, accept) else {
        return;
    };

    match HeaderValue::from_str(&rewritten) {
        Ok(value) => {
            debug!(from = %current, to = %rewritten, "Content-Type 변경");
            headers.insert(CONTENT_TYPE, value);
        }
        Err(e) => {
            warn!(error = %e, value = %rewritten, "Content-Type 헤더 생성 실패");
        }
    }
}
