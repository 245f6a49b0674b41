use dash_chat::classify::{classify, strip_fence};
use dash_chat::models::*;
use dash_chat::render::render_content;
use serde_json::json;
use speculate2::speculate;

speculate! {
    describe "strip_fence" {
        it "removes a json fence and surrounding whitespace" {
            assert_eq!(strip_fence("```json\n {\"a\": 1} \n```"), "{\"a\": 1}");
        }

        it "leaves unfenced text trimmed but otherwise alone" {
            assert_eq!(strip_fence("  ```python\nprint()\n```  "), "```python\nprint()\n```");
        }
    }

    describe "classify" {
        describe "text that is not JSON" {
            it "returns the fence-stripped text" {
                for raw in ["We estimate 10 hours.", "```json\nnot json\n```", "{", ""] {
                    assert_eq!(classify(raw), BotContent::text(strip_fence(raw)));
                }
            }
        }

        describe "fenced answer" {
            it "returns the answer field as text" {
                assert_eq!(
                    classify("```json\n{\"answer\":\"hi\"}\n```"),
                    BotContent::text("hi")
                );
            }
        }

        describe "hours object" {
            it "returns one row per hours key" {
                assert_eq!(
                    classify(r#"{"cpu_hours": 3, "gpu_hours": 5}"#),
                    BotContent::Hours {
                        rows: vec![HoursRow::new("Cpu", 3), HoursRow::new("Gpu", 5)],
                    }
                );
            }

            it "wins over an answer field" {
                let content = classify(r#"{"answer": "see table", "ios_hours": 8}"#);
                assert_eq!(
                    content,
                    BotContent::Hours { rows: vec![HoursRow::new("Ios", 8)] }
                );
            }
        }

        describe "features array" {
            it "returns one titled section per feature" {
                assert_eq!(
                    classify(r#"{"features":[{"name":"Login","android_hours":2}]}"#),
                    BotContent::Features {
                        sections: vec![FeatureSection {
                            name: Some(json!("Login")),
                            rows: vec![HoursRow::new("Android", 2)],
                        }],
                    }
                );
            }

            it "keeps values opaque" {
                let content = classify(
                    r#"{"features":[{"name":"Chat","api_hours":"10-12","website_hours":null,"hourly_rate":40}]}"#,
                );
                let BotContent::Features { sections } = content else {
                    panic!("expected features, got {:?}", content);
                };
                assert_eq!(
                    sections[0].rows,
                    vec![HoursRow::new("Api", "10-12"), HoursRow::new("Website", json!(null))]
                );
            }
        }

        describe "unrecognised JSON" {
            it "returns the compact JSON text" {
                assert_eq!(
                    classify("```json\n{\"status\": \"ok\", \"items\": [1, 2]}\n```"),
                    BotContent::text(r#"{"status":"ok","items":[1,2]}"#)
                );
            }
        }
    }

    describe "render_content" {
        it "renders a classified features response" {
            let content = classify(
                "```json\n{\"features\":[{\"name\":\"Booking\",\"android_hours\":12,\"ios_hours\":14}]}\n```",
            );
            let expected = "\
Booking
+----------+-------+
| Platform | Hours |
+----------+-------+
| Android  | 12    |
| Ios      | 14    |
+----------+-------+
";
            assert_eq!(render_content(&content), expected);
        }
    }
}
