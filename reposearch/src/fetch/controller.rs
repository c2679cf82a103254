use crate::{fetch::http::Fetcher, query::EndpointUrl, utils::any::Any};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// The raw response body, or `None` if the retrieval failed for any reason.
pub type FetchResult = Option<String>;

/// Receives the outcome of the fetch slot. Both methods are only ever invoked from the task that owns the
/// [`FetchController`].
pub trait FetchCallback {
    fn on_finished(&mut self, result: FetchResult);

    fn on_reset(&mut self) {}
}

#[derive(Clone, Debug)]
pub struct FetchRequest {
    generation: u64,
    url: EndpointUrl,
}

/// Posted by a worker task when its retrieval finishes.
#[derive(Debug)]
pub struct Completion {
    generation: u64,
    result: FetchResult,
}

#[derive(Default)]
enum SlotState {
    #[default]
    Unarmed,
    Pending(FetchRequest),
    Delivered {
        request: FetchRequest,
        result: FetchResult,
    },
    TornDown,
}

/// Owns the single fetch slot.
///
/// Arming spawns a worker task that performs one retrieval and posts a [`Completion`] back over a channel; the owner
/// task awaits [`FetchController::completion`] and hands what it gets to [`FetchController::deliver`], which forwards
/// it to the callback only if it belongs to the most recently armed request. Work that has been superseded is never
/// cancelled, its completion is just dropped.
pub struct FetchController<F> {
    fetcher: Arc<F>,
    state: SlotState,
    generation: u64,
    sender: UnboundedSender<Completion>,
    receiver: UnboundedReceiver<Completion>,
}

impl<F: Fetcher> FetchController<F> {
    pub const SLOT_ID: &'static str = "repository-search";

    pub fn new(fetcher: F) -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();

        Self {
            fetcher: fetcher.arc(),
            state: SlotState::Unarmed,
            generation: 0,
            sender,
            receiver,
        }
    }

    /// Attaches a (re)created host to the slot. A delivered result is handed to `callback` again, a pending fetch is
    /// left alone, and an unarmed slot is armed only if `target` is present.
    pub fn init<C: FetchCallback>(&mut self, target: Option<EndpointUrl>, callback: &mut C) {
        match &self.state {
            SlotState::Unarmed => {
                if let Some(url) = target {
                    self.arm(url);
                }
            }
            SlotState::Pending(_request) => {}
            SlotState::Delivered { result, .. } => callback.on_finished(result.clone()),
            SlotState::TornDown => tracing::warn!(slot = Self::SLOT_ID, "ignoring init of a torn down slot"),
        }
    }

    /// Arms the slot with `url`, replacing whatever request it held.
    pub fn start(&mut self, url: EndpointUrl) {
        match &self.state {
            SlotState::TornDown => {
                tracing::warn!(slot = Self::SLOT_ID, %url, "ignoring start of a torn down slot");

                return;
            }
            SlotState::Pending(request) => {
                tracing::info!(slot = Self::SLOT_ID, superseded_url = %request.url, %url, "restarting fetch");
            }
            SlotState::Unarmed | SlotState::Delivered { .. } => {}
        }

        self.arm(url);
    }

    fn arm(&mut self, url: EndpointUrl) {
        self.generation += 1;

        let request = FetchRequest {
            generation: self.generation,
            url,
        };
        let worker_request = request.clone();
        let fetcher = self.fetcher.clone();
        let sender = self.sender.clone();

        tracing::info!(slot = Self::SLOT_ID, generation = request.generation, url = %request.url, "arming fetch");

        tokio::spawn(async move {
            let result = fetcher.fetch(&worker_request.url).await.warn();
            let completion = Completion {
                generation: worker_request.generation,
                result,
            };

            // NOTE: sending only fails once the slot has been torn down, at which point nobody wants the result
            sender.send(completion).unit();
        });

        self.state = SlotState::Pending(request);
    }

    /// Waits for the next completion posted by any worker. Cancel safe, so it can sit in a `tokio::select!` branch.
    /// Returns `None` once the slot has been torn down.
    pub async fn completion(&mut self) -> Option<Completion> {
        self.receiver.recv().await
    }

    /// Forwards `completion` to `callback` if it answers the currently pending request, and reports whether it did.
    pub fn deliver<C: FetchCallback>(&mut self, completion: Completion, callback: &mut C) -> bool {
        let state = self.state.mem_take();
        let SlotState::Pending(request) = state else {
            self.state = state;
            tracing::debug!(slot = Self::SLOT_ID, generation = completion.generation, "dropping unexpected completion");

            return false;
        };

        if request.generation != completion.generation {
            tracing::debug!(
                slot = Self::SLOT_ID,
                generation = completion.generation,
                current_generation = request.generation,
                "dropping stale completion",
            );
            self.state = SlotState::Pending(request);

            return false;
        }

        tracing::info!(
            slot = Self::SLOT_ID,
            generation = request.generation,
            succeeded = completion.result.is_some(),
            "delivering fetch result",
        );
        callback.on_finished(completion.result.clone());
        self.state = SlotState::Delivered {
            request,
            result: completion.result,
        };

        true
    }

    /// Permanently detaches the slot from its host. Nothing is delivered after this returns.
    pub fn teardown<C: FetchCallback>(&mut self, callback: &mut C) {
        if matches!(self.state, SlotState::TornDown) {
            return;
        }

        tracing::info!(slot = Self::SLOT_ID, "tearing down");
        self.receiver.close();
        self.state = SlotState::TornDown;
        callback.on_reset();
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SlotState::Pending(_))
    }

    pub fn target(&self) -> Option<&EndpointUrl> {
        match &self.state {
            SlotState::Pending(request) | SlotState::Delivered { request, .. } => Some(&request.url),
            SlotState::Unarmed | SlotState::TornDown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchCallback, FetchController, FetchResult};
    use crate::{
        error::Error,
        fetch::http::Fetcher,
        query::{EndpointUrl, QueryBuilder},
        utils::any::Any,
    };
    use parking_lot::Mutex;
    use std::{collections::HashMap, future::Future, sync::Arc};
    use tokio::sync::oneshot::{self, Receiver, Sender};

    // NOTE: each fetch waits until the test releases the gate registered for its url, so the order in which
    // workers finish is decided by the test
    #[derive(Clone, Default)]
    struct GatedFetcher {
        gates: Arc<Mutex<HashMap<String, Receiver<FetchResult>>>>,
    }

    impl GatedFetcher {
        fn gate(&self, url: &EndpointUrl) -> Sender<FetchResult> {
            let (sender, receiver) = oneshot::channel();

            self.gates.lock().insert(url.to_string(), receiver);

            sender
        }
    }

    impl Fetcher for GatedFetcher {
        fn fetch(&self, url: &EndpointUrl) -> impl Future<Output = Result<String, Error>> + Send {
            let gate = self.gates.lock().remove(url.as_str());
            let url = url.to_string();

            async move {
                let Some(gate) = gate else {
                    return Error::EmptyResponse(url).err();
                };

                gate.await.ok().flatten().ok_or(Error::EmptyResponse(url))
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        finished: Vec<FetchResult>,
        resets: usize,
    }

    impl FetchCallback for Recorder {
        fn on_finished(&mut self, result: FetchResult) {
            self.finished.push(result);
        }

        fn on_reset(&mut self) {
            self.resets += 1;
        }
    }

    fn search_url(query: &str) -> EndpointUrl {
        QueryBuilder::new("https://api.github.com/search/repositories", "q".into(), None)
            .unwrap()
            .build(query)
            .unwrap()
    }

    async fn deliver_next(controller: &mut FetchController<GatedFetcher>, recorder: &mut Recorder) -> bool {
        let completion = controller.completion().await.unwrap();

        controller.deliver(completion, recorder)
    }

    #[tokio::test]
    async fn delivers_the_unmodified_body() {
        let fetcher = GatedFetcher::default();
        let mut controller = FetchController::new(fetcher.clone());
        let mut recorder = Recorder::default();
        let url = search_url("android");
        let gate = fetcher.gate(&url);

        assert_eq!(url.as_str(), "https://api.github.com/search/repositories?q=android");

        controller.start(url.clone());

        assert!(controller.is_pending());
        assert_eq!(controller.target(), Some(&url));

        gate.send(Some("{\"total_count\":1}".into())).unwrap();

        assert!(deliver_next(&mut controller, &mut recorder).await);
        assert_eq!(recorder.finished, [Some("{\"total_count\":1}".to_owned())]);
        assert!(!controller.is_pending());
        assert_eq!(controller.target(), Some(&url));
    }

    #[tokio::test]
    async fn failed_fetch_delivers_none() {
        let fetcher = GatedFetcher::default();
        let mut controller = FetchController::new(fetcher.clone());
        let mut recorder = Recorder::default();
        let url = search_url("android");
        let gate = fetcher.gate(&url);

        controller.start(url);
        drop(gate);

        assert!(deliver_next(&mut controller, &mut recorder).await);
        assert_eq!(recorder.finished, [None]);
    }

    #[tokio::test]
    async fn rearming_delivers_only_the_latest_result_when_the_stale_one_finishes_first() {
        let fetcher = GatedFetcher::default();
        let mut controller = FetchController::new(fetcher.clone());
        let mut recorder = Recorder::default();
        let first_url = search_url("first");
        let second_url = search_url("second");
        let first_gate = fetcher.gate(&first_url);
        let second_gate = fetcher.gate(&second_url);

        controller.start(first_url);
        controller.start(second_url.clone());

        assert_eq!(controller.target(), Some(&second_url));

        first_gate.send(Some("first".into())).unwrap();

        assert!(!deliver_next(&mut controller, &mut recorder).await);
        assert!(controller.is_pending());

        second_gate.send(Some("second".into())).unwrap();

        assert!(deliver_next(&mut controller, &mut recorder).await);
        assert_eq!(recorder.finished, [Some("second".to_owned())]);
    }

    #[tokio::test]
    async fn rearming_delivers_only_the_latest_result_when_the_stale_one_finishes_last() {
        let fetcher = GatedFetcher::default();
        let mut controller = FetchController::new(fetcher.clone());
        let mut recorder = Recorder::default();
        let first_url = search_url("first");
        let second_url = search_url("second");
        let first_gate = fetcher.gate(&first_url);
        let second_gate = fetcher.gate(&second_url);

        controller.start(first_url);
        controller.start(second_url);
        second_gate.send(Some("second".into())).unwrap();

        assert!(deliver_next(&mut controller, &mut recorder).await);

        first_gate.send(Some("first".into())).unwrap();

        assert!(!deliver_next(&mut controller, &mut recorder).await);
        assert_eq!(recorder.finished, [Some("second".to_owned())]);
    }

    #[tokio::test]
    async fn init_without_a_target_performs_no_work() {
        let mut controller = FetchController::new(GatedFetcher::default());
        let mut recorder = Recorder::default();

        controller.init(None, &mut recorder);
        tokio::task::yield_now().await;

        assert!(!controller.is_pending());
        assert!(controller.target().is_none());
        assert!(controller.receiver.try_recv().is_err());
        assert!(recorder.finished.is_empty());
    }

    #[tokio::test]
    async fn init_with_a_target_arms_an_unarmed_slot() {
        let fetcher = GatedFetcher::default();
        let mut controller = FetchController::new(fetcher.clone());
        let mut recorder = Recorder::default();
        let url = search_url("android");
        let gate = fetcher.gate(&url);

        controller.init(url.clone().some(), &mut recorder);

        assert!(controller.is_pending());

        // NOTE: a second init while pending must neither rearm nor deliver
        controller.init(search_url("other").some(), &mut recorder);

        assert_eq!(controller.target(), Some(&url));

        gate.send(Some("body".into())).unwrap();

        assert!(deliver_next(&mut controller, &mut recorder).await);
        assert_eq!(recorder.finished, [Some("body".to_owned())]);
    }

    #[tokio::test]
    async fn init_after_delivery_redelivers_the_cached_result() {
        let fetcher = GatedFetcher::default();
        let mut controller = FetchController::new(fetcher.clone());
        let mut recorder = Recorder::default();
        let url = search_url("android");
        let gate = fetcher.gate(&url);

        controller.start(url.clone());
        gate.send(Some("body".into())).unwrap();
        deliver_next(&mut controller, &mut recorder).await;

        let mut recreated = Recorder::default();

        controller.init(None, &mut recreated);

        assert_eq!(recreated.finished, [Some("body".to_owned())]);
        assert_eq!(controller.target(), Some(&url));
        assert!(!controller.is_pending());
    }

    #[tokio::test]
    async fn nothing_is_delivered_after_teardown() {
        let fetcher = GatedFetcher::default();
        let mut controller = FetchController::new(fetcher.clone());
        let mut recorder = Recorder::default();
        let url = search_url("android");
        let gate = fetcher.gate(&url);

        controller.start(url.clone());
        controller.teardown(&mut recorder);
        controller.teardown(&mut recorder);

        assert_eq!(recorder.resets, 1);

        gate.send(Some("body".into())).unwrap();

        assert!(controller.completion().await.is_none());

        controller.start(url);

        assert!(!controller.is_pending());
        assert!(recorder.finished.is_empty());
    }
}
