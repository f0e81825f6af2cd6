use transcript_store::TranscriptStore;

use crate::{
    cache::TranscriptCache,
    context::ContextFetcher,
    document::DocumentFetcher,
    prompt::PromptComposer,
    yt::TranscriptFetcher,
    Assistant, CompletionParams, Completer,
};

pub struct AssistantBuilder<C = (), D = (), S = (), F = ()> {
    completer: C,
    documents: D,
    store: S,
    transcript_fetcher: F,
    composer: PromptComposer,
    params: CompletionParams,
}

impl AssistantBuilder {
    pub fn new() -> Self {
        Self {
            completer: (),
            documents: (),
            store: (),
            transcript_fetcher: (),
            composer: PromptComposer::default(),
            params: CompletionParams::default(),
        }
    }
}

impl Default for AssistantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, D, S, F> AssistantBuilder<C, D, S, F> {
    pub fn completer<C2: Completer + Send + Sync>(
        self,
        completer: C2,
    ) -> AssistantBuilder<C2, D, S, F> {
        AssistantBuilder {
            completer,
            documents: self.documents,
            store: self.store,
            transcript_fetcher: self.transcript_fetcher,
            composer: self.composer,
            params: self.params,
        }
    }

    pub fn documents<D2: DocumentFetcher + Send + Sync>(
        self,
        documents: D2,
    ) -> AssistantBuilder<C, D2, S, F> {
        AssistantBuilder {
            completer: self.completer,
            documents,
            store: self.store,
            transcript_fetcher: self.transcript_fetcher,
            composer: self.composer,
            params: self.params,
        }
    }

    pub fn store<S2: TranscriptStore + Send + Sync>(self, store: S2) -> AssistantBuilder<C, D, S2, F> {
        AssistantBuilder {
            completer: self.completer,
            documents: self.documents,
            store,
            transcript_fetcher: self.transcript_fetcher,
            composer: self.composer,
            params: self.params,
        }
    }

    pub fn transcript_fetcher<F2: TranscriptFetcher + Send + Sync>(
        self,
        transcript_fetcher: F2,
    ) -> AssistantBuilder<C, D, S, F2> {
        AssistantBuilder {
            completer: self.completer,
            documents: self.documents,
            store: self.store,
            transcript_fetcher,
            composer: self.composer,
            params: self.params,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = temperature;
        self
    }

    pub fn max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.composer = PromptComposer::new(max_context_chars);
        self
    }
}

impl<C, D, S, F> AssistantBuilder<C, D, S, F>
where
    C: Completer + Send + Sync,
    D: DocumentFetcher + Send + Sync,
    S: TranscriptStore + Send + Sync,
    F: TranscriptFetcher + Send + Sync,
{
    pub fn build(self) -> Assistant<C, D, S, F> {
        Assistant {
            completer: self.completer,
            context: ContextFetcher::new(
                self.documents,
                TranscriptCache::new(self.store, self.transcript_fetcher),
            ),
            composer: self.composer,
            params: self.params,
        }
    }
}
