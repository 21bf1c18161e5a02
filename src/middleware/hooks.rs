use std::sync::{Arc, Mutex, MutexGuard};
use hyper::HeaderMap;
use tracing::{debug, warn};

/// 응답 헤더 전송 직전에 한 번 실행되는 콜백
pub type StartingCallback = Box<dyn FnOnce(&mut HeaderMap) + Send + 'static>;

#[derive(Default)]
struct HookState {
    callbacks: Vec<StartingCallback>,
    started: bool,
}

/// 응답 헤더가 전송되기 직전에 실행될 콜백 목록
///
/// 호스트가 요청마다 하나씩 만들어 요청 extensions 에 넣어 둡니다.
/// 미들웨어는 `on_starting` 으로 콜백을 등록하고, 호스트는 응답을
/// hyper 에 넘기기 직전에 `fire` 를 정확히 한 번 호출합니다.
/// 핸들은 `Clone` 으로 공유되며 모두 같은 목록을 가리킵니다.
#[derive(Clone, Default)]
pub struct ResponseHooks {
    inner: Arc<Mutex<HookState>>,
}

impl ResponseHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 요청에 붙어 있는 훅 목록을 반환하고, 없으면 새로 붙입니다.
    pub fn attach<B>(req: &mut hyper::Request<B>) -> Self {
        if let Some(hooks) = req.extensions().get::<ResponseHooks>() {
            return hooks.clone();
        }
        let hooks = Self::new();
        req.extensions_mut().insert(hooks.clone());
        hooks
    }

    pub fn from_request<B>(req: &hyper::Request<B>) -> Option<Self> {
        req.extensions().get::<ResponseHooks>().cloned()
    }

    /// 콜백을 등록합니다. 이미 등록된 콜백들 뒤에 실행됩니다.
    ///
    /// 헤더가 이미 전송된 뒤라면 콜백은 실행되지 않고 버려집니다.
    pub fn on_starting<F>(&self, callback: F)
    where
        F: FnOnce(&mut HeaderMap) + Send + 'static,
    {
        let mut state = self.lock();
        if state.started {
            warn!("응답 헤더가 이미 전송되어 콜백 등록을 무시합니다");
            return;
        }
        state.callbacks.push(Box::new(callback));
    }

    /// 등록된 콜백을 순서대로 실행하고 실행한 개수를 반환합니다.
    ///
    /// 두 번째 호출부터는 아무것도 하지 않습니다.
    pub fn fire(&self, headers: &mut HeaderMap) -> usize {
        let callbacks = {
            let mut state = self.lock();
            if state.started {
                return 0;
            }
            state.started = true;
            std::mem::take(&mut state.callbacks)
        };

        let count = callbacks.len();
        for callback in callbacks {
            callback(&mut *headers);
        }
        debug!(callbacks = count, "응답 시작 훅 실행 완료");
        count
    }

    pub fn is_started(&self) -> bool {
        self.lock().started
    }

    pub fn len(&self) -> usize {
        self.lock().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // 콜백 안에서 panic 이 나도 목록 자체는 일관된 상태로 남습니다.
    fn lock(&self) -> MutexGuard<'_, HookState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ResponseHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ResponseHooks")
            .field("callbacks", &state.callbacks.len())
            .field("started", &state.started)
            .finish()
    }
}
