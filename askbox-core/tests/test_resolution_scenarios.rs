use askbox_core::{
    AlgorithmTopic, AnswerSource, BotReply, ChatSession, KnowledgeBase, KnowledgeEntry,
    MemoryStore, Resolver, ALGORITHM_CONFIDENCE, GST_CONFIDENCE, MATCH_THRESHOLD, SUGGESTIONS,
};

fn resolver() -> Resolver {
    Resolver::default()
}

#[test]
fn scenario_gst_exclusive() {
    let r = resolver().resolve("Calculate GST for 1000 at 18% exclusive");
    assert_eq!(r.source, AnswerSource::Gst);
    assert_eq!(r.confidence, GST_CONFIDENCE);
    let text = r.answer.unwrap();
    assert!(text.contains("Base amount: ₹1000.00"));
    assert!(text.contains("GST: ₹180.00"));
    assert!(text.contains("Total: ₹1180.00"));
}

#[test]
fn scenario_gst_inclusive() {
    let r = resolver().resolve("GST inclusive for 1180 at 18%");
    assert_eq!(r.source, AnswerSource::Gst);
    let text = r.answer.unwrap();
    assert!(text.contains("Base amount: ₹1000.00"));
    assert!(text.contains("GST: ₹180.00"));
    assert!(text.contains("Total: ₹1180.00"));
}

#[test]
fn scenario_explain_quicksort() {
    let r = resolver().resolve("Explain quicksort");
    assert_eq!(
        r.source,
        AnswerSource::Algorithm {
            topic: AlgorithmTopic::QuickSort
        }
    );
    assert_eq!(r.confidence, ALGORITHM_CONFIDENCE);
    let text = r.answer.unwrap();
    assert!(text.contains("O(n log n)"));
    assert!(text.contains("partition(a, lo, hi)"));
}

#[test]
fn scenario_hello_matches_greeting() {
    let r = resolver().resolve("hello");
    assert_eq!(
        r.source,
        AnswerSource::Knowledge {
            id: "greeting".to_string()
        }
    );
    assert!(r.confidence >= MATCH_THRESHOLD);
}

#[test]
fn scenario_gibberish_falls_back_with_fixed_suggestions() {
    let mut session = ChatSession::open(resolver(), MemoryStore::default());
    let reply = session.ask("asdkjalskd").unwrap();
    match reply {
        BotReply::Fallback {
            suggestions,
            confidence,
            ..
        } => {
            assert!(confidence < MATCH_THRESHOLD);
            let expected: Vec<String> = SUGGESTIONS.iter().map(|s| s.to_string()).collect();
            assert_eq!(suggestions, expected);
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}

#[test]
fn scenario_bad_import_keeps_greeting() {
    let mut session = ChatSession::open(resolver(), MemoryStore::default());
    assert!(!session.import_knowledge_base("not json"));
    let reply = session.ask("hello").unwrap();
    assert_eq!(reply.display_text(), "Hello! How can I assist?");
}

#[test]
fn gst_preempts_knowledge_base() {
    // "hello" alone would match the greeting entry.
    let r = resolver().resolve("hello, calculate gst for 250 at 5%");
    assert_eq!(r.source, AnswerSource::Gst);
}

#[test]
fn algorithm_preempts_knowledge_base() {
    // "help" alone would match the capabilities entry.
    let r = resolver().resolve("help with binary search");
    assert_eq!(
        r.source,
        AnswerSource::Algorithm {
            topic: AlgorithmTopic::BinarySearch
        }
    );
}

#[test]
fn confidence_ordering() {
    let res = resolver();
    let gst = res.resolve("gst on 100 at 12%").confidence;
    let algo = res.resolve("explain merge sort").confidence;
    let kb = res.resolve("hello").confidence;
    assert!(gst > algo);
    assert!(algo > kb);
    assert!(kb < 1.0);
}

#[test]
fn export_then_import_is_idempotent() {
    let queries = [
        "hello",
        "what is gst?",
        "contact support by email",
        "thank you",
        "asdkjalskd",
        "what can you do?",
    ];

    let res = resolver();
    let before: Vec<_> = queries.iter().map(|q| res.resolve(q)).collect();

    let exported = res.knowledge().export().unwrap();
    res.knowledge().import(exported).unwrap();

    let after: Vec<_> = queries.iter().map(|q| res.resolve(q)).collect();
    assert_eq!(before, after);
}

#[test]
fn import_is_atomic_under_concurrent_lookups() {
    let set_a = vec![KnowledgeEntry::new("a", &["hello"], "A", "answer-a")];
    let set_b = vec![KnowledgeEntry::new("b", &["hello"], "B", "answer-b")];
    let res = Resolver::new(KnowledgeBase::new(set_a.clone()));

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..500 {
                let next = if i % 2 == 0 { set_b.clone() } else { set_a.clone() };
                res.knowledge().import(next).unwrap();
            }
        });

        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..500 {
                    let entries = res.knowledge().snapshot();
                    assert_eq!(entries.len(), 1);
                    let answer = res.resolve("hello").answer.unwrap();
                    assert!(answer == "answer-a" || answer == "answer-b");
                }
            });
        }
    });
}
