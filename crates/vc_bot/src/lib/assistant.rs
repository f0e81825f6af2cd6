pub mod builder;

use transcript_store::TranscriptStore;

use crate::{
    context::ContextFetcher,
    document::DocumentFetcher,
    error::Error,
    prompt::{ContextBlock, PromptComposer},
    registry::LIBRARY_SOURCE_NAME,
    session::{HistoryEntry, Session},
    yt::TranscriptFetcher,
    CompletionParams, Completer,
};

/// Answers questions from the session's knowledge sources:
/// fetch context, compose the prompt, complete, record.
#[derive(Debug)]
pub struct Assistant<C, D, S, F>
where
    C: Completer + Send + Sync,
    D: DocumentFetcher + Send + Sync,
    S: TranscriptStore + Send + Sync,
    F: TranscriptFetcher + Send + Sync,
{
    completer: C,
    context: ContextFetcher<D, S, F>,
    composer: PromptComposer,
    params: CompletionParams,
}

impl<C, D, S, F> Assistant<C, D, S, F>
where
    C: Completer + Send + Sync,
    D: DocumentFetcher + Send + Sync,
    S: TranscriptStore + Send + Sync,
    F: TranscriptFetcher + Send + Sync,
{
    pub fn context(&self) -> &ContextFetcher<D, S, F> {
        &self.context
    }

    /// Answers `question` from the named source and appends the exchange to
    /// the session history. A source that cannot be fetched contributes an
    /// empty context; a failed completion appends nothing.
    #[tracing::instrument(skip(self, session, question))]
    pub async fn ask<'s>(
        &self,
        session: &'s mut Session,
        source_name: &str,
        question: &str,
        voice: bool,
    ) -> Result<&'s HistoryEntry, Error> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }

        let source = session
            .registry
            .get(source_name)
            .cloned()
            .ok_or_else(|| Error::UnknownSource(source_name.to_string()))?;

        let context = self.context.fetch_or_empty(&source).await;
        let answer = self
            .answer(
                &self.composer,
                question,
                &[ContextBlock::new(&source.name, context)],
            )
            .await?;

        Ok(session
            .history
            .append(HistoryEntry::new(source.name, question, answer, voice)))
    }

    /// Answers `question` from every cached transcript at once.
    #[tracing::instrument(skip(self, session, question))]
    pub async fn ask_library<'s>(
        &self,
        session: &'s mut Session,
        question: &str,
        voice: bool,
    ) -> Result<&'s HistoryEntry, Error> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }

        // the library text is already cut to its own budget
        let block = ContextBlock::new(LIBRARY_SOURCE_NAME, self.context.library_context().await);
        let answer = self
            .answer(
                &self.composer.with_header_of(&block),
                question,
                std::slice::from_ref(&block),
            )
            .await?;

        Ok(session.history.append(HistoryEntry::new(
            LIBRARY_SOURCE_NAME,
            question,
            answer,
            voice,
        )))
    }

    async fn answer(
        &self,
        composer: &PromptComposer,
        question: &str,
        contexts: &[ContextBlock],
    ) -> Result<String, Error> {
        let prompt = composer.compose(question, contexts);

        self.completer
            .complete(&prompt, self.params.max_tokens, self.params.temperature)
            .await
            .map_err(|e| Error::Completion(e.into()))
    }
}
