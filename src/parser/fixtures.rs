//! Small PDFs built in memory with lopdf, for parser tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object};

/// Where a test page keeps its MediaBox.
#[derive(Debug, Clone, Copy)]
pub enum MediaBox {
    /// Inherited from the `/Pages` node
    Inherited,
    /// Stored directly in the page dictionary
    Inline([f32; 4]),
    /// Stored as an indirect object referenced by the page
    Indirect([f32; 4]),
}

/// One page of a test document.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub operations: Vec<Operation>,
    pub media_box: MediaBox,
    /// `/Contents` points at a non-stream object
    pub broken: bool,
}

impl TestPage {
    /// A page showing each `(text, size, x, baseline)` with `Tf`/`Tm`/`Tj`.
    pub fn with_lines(lines: &[(&str, f32, f32, f32)]) -> Self {
        let mut operations = vec![Operation::new("BT", vec![])];
        for &(text, size, x, y) in lines {
            operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
            operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    x.into(),
                    y.into(),
                ],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        }
        operations.push(Operation::new("ET", vec![]));
        Self::from_operations(operations)
    }

    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self {
            operations,
            media_box: MediaBox::Inherited,
            broken: false,
        }
    }

    /// A page whose content cannot be read.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::from_operations(Vec::new())
        }
    }

    pub fn with_media_box(mut self, media_box: MediaBox) -> Self {
        self.media_box = media_box;
        self
    }
}

fn rect(bounds: [f32; 4]) -> Object {
    Object::Array(bounds.iter().map(|&v| v.into()).collect())
}

/// Serialize pages into a PDF sharing one Helvetica `F1` font and the
/// given `/Pages`-level MediaBox.
pub fn build_pdf(pages: &[TestPage], inherited_box: [f32; 4]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let contents_id = if page.broken {
            doc.add_object(Object::Integer(0))
        } else {
            let content = Content {
                operations: page.operations.clone(),
            };
            let data = content.encode().expect("test content encodes");
            doc.add_object(lopdf::Stream::new(dictionary! {}, data))
        };

        let mut dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents_id,
        };
        match page.media_box {
            MediaBox::Inherited => {}
            MediaBox::Inline(bounds) => dict.set("MediaBox", rect(bounds)),
            MediaBox::Indirect(bounds) => {
                let box_id = doc.add_object(rect(bounds));
                dict.set("MediaBox", box_id);
            }
        }
        kids.push(doc.add_object(dict).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => rect(inherited_box),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).expect("test document saves");
    data
}
