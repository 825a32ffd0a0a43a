use once_cell::sync::OnceCell;
use tracing::debug;

use crate::model::{ContextEntry, EntryLinks};

/// Attach derived links to every page, action and event of `context`.
///
/// Links are positions into the owning vectors: each page learns its own
/// position, each action its page, its position and the position of the
/// action that follows it in the same page, each event its page and position.
/// Memoized derivations are reset, so running this again after the graph
/// changed yields fresh results.
pub fn index_model(context: &mut ContextEntry) {
    let mut total_actions = 0usize;
    let mut total_events = 0usize;

    for (page_idx, page) in context.pages.iter_mut().enumerate() {
        page.position = Some(page_idx);

        let action_count = page.actions.len();
        for (idx, action) in page.actions.iter_mut().enumerate() {
            let next = idx + 1;
            action.links = Some(EntryLinks {
                page: page_idx,
                index: idx,
                next: (next < action_count).then_some(next),
            });
            action.events_memo = OnceCell::new();
            action.resources_memo = OnceCell::new();
        }

        for (idx, event) in page.events.iter_mut().enumerate() {
            event.links = Some(EntryLinks {
                page: page_idx,
                index: idx,
                next: None,
            });
            event.events_memo = OnceCell::new();
            event.resources_memo = OnceCell::new();
        }

        total_actions += action_count;
        total_events += page.events.len();
    }

    debug!(
        pages = context.pages.len(),
        actions = total_actions,
        events = total_events,
        resources = context.resources.len(),
        "trace model indexed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionTraceEvent, CallMetadata, PageEntry};

    fn is_indexed(context: &ContextEntry) -> bool {
        context.pages.iter().all(|page| {
            page.position.is_some()
                && page.actions.iter().all(|a| a.links.is_some())
                && page.events.iter().all(|e| e.links.is_some())
        })
    }

    fn call(id: &str, start: f64) -> CallMetadata {
        CallMetadata {
            id: id.into(),
            start_time: start,
            end_time: start + 1.0,
            ..CallMetadata::default()
        }
    }

    fn sample() -> ContextEntry {
        let mut first = PageEntry::new("page@1");
        first.actions = vec![
            ActionTraceEvent::action(call("a1", 0.0)),
            ActionTraceEvent::action(call("a2", 10.0)),
            ActionTraceEvent::action(call("a3", 20.0)),
        ];
        first.events = vec![ActionTraceEvent::event(call("e1", 5.0))];

        let mut second = PageEntry::new("page@2");
        second.actions = vec![ActionTraceEvent::action(call("b1", 3.0))];

        ContextEntry {
            pages: vec![first, second],
            ..ContextEntry::default()
        }
    }

    #[test]
    fn links_follow_page_order() {
        let mut ctx = sample();
        assert!(!is_indexed(&ctx));
        index_model(&mut ctx);
        assert!(is_indexed(&ctx));

        let actions = &ctx.pages[0].actions;
        assert_eq!(actions[0].links().unwrap().next, Some(1));
        assert_eq!(actions[1].links().unwrap().next, Some(2));
        assert_eq!(actions[2].links().unwrap().next, None);

        let lone = ctx.pages[1].actions[0].links().unwrap();
        assert_eq!(lone.page, 1);
        assert_eq!(lone.next, None);

        let event = ctx.pages[0].events[0].links().unwrap();
        assert_eq!(event.page, 0);
        assert_eq!(event.index, 0);
        assert_eq!(ctx.pages[1].position(), Some(1));
    }

    #[test]
    fn indexing_twice_is_idempotent() {
        let mut ctx = sample();
        index_model(&mut ctx);
        let first: Vec<_> = ctx
            .pages
            .iter()
            .flat_map(|p| p.actions.iter().chain(p.events.iter()))
            .map(|a| a.links())
            .collect();

        index_model(&mut ctx);
        let second: Vec<_> = ctx
            .pages
            .iter()
            .flat_map(|p| p.actions.iter().chain(p.events.iter()))
            .map(|a| a.links())
            .collect();

        assert_eq!(first, second);
    }

    #[test]
    fn reindexing_resets_memoized_windows() {
        let mut ctx = sample();
        index_model(&mut ctx);
        ctx.pages[0].actions[0].events_memo.set(vec![42]).unwrap();

        index_model(&mut ctx);
        assert!(ctx.pages[0].actions[0].events_memo.get().is_none());
    }
}
