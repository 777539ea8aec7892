use crate::converter::{EmbeddedImage, ImageAttributes, ImageHandler};
use crate::host::HostDocument;
use crate::{ImageEmbedding, Result};

/// Resolves embedded pictures to `data:` URIs or host `blob:` references.
pub(crate) struct ImageEmbedder<'a> {
    embedding: ImageEmbedding,
    host: &'a HostDocument,
    created: Vec<String>,
}

impl<'a> ImageEmbedder<'a> {
    pub(crate) fn new(embedding: ImageEmbedding, host: &'a HostDocument) -> Self {
        Self {
            embedding,
            host,
            created: Vec::new(),
        }
    }

    /// Revokes every `blob:` reference this embedder registered.
    pub(crate) fn revoke_created(&mut self) {
        for url in self.created.drain(..) {
            self.host.revoke_object_url(&url);
        }
    }
}

impl ImageHandler for ImageEmbedder<'_> {
    fn convert_image(&mut self, image: &EmbeddedImage) -> Result<ImageAttributes> {
        let src = match self.embedding {
            ImageEmbedding::DataUri => {
                format!("data:{};base64,{}", image.content_type(), image.read_base64())
            }
            ImageEmbedding::Blob => {
                let url = self
                    .host
                    .create_object_url(image.read().to_vec(), image.content_type());
                self.created.push(url.clone());
                url
            }
        };
        Ok(ImageAttributes { src, alt: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_uses_content_type() {
        let host = HostDocument::new();
        let mut embedder = ImageEmbedder::new(ImageEmbedding::DataUri, &host);
        let attrs = embedder
            .convert_image(&EmbeddedImage::new(Some("image/gif".into()), vec![0xFF, 0x00]))
            .unwrap();
        assert_eq!(attrs.src, "data:image/gif;base64,/wA=");
    }

    #[test]
    fn test_blob_is_registered_in_host() {
        let host = HostDocument::new();
        let mut embedder = ImageEmbedder::new(ImageEmbedding::Blob, &host);
        let attrs = embedder
            .convert_image(&EmbeddedImage::new(None, vec![7]))
            .unwrap();
        let blob = host.blob(&attrs.src).expect("blob registered");
        assert_eq!(blob.content_type, "image/png");
        assert_eq!(blob.data, vec![7]);
    }

    #[test]
    fn test_revoke_created_releases_only_own_blobs() {
        let host = HostDocument::new();
        let other = host.create_object_url(vec![1], "image/png");
        let mut embedder = ImageEmbedder::new(ImageEmbedding::Blob, &host);
        for byte in [2, 3] {
            embedder
                .convert_image(&EmbeddedImage::new(None, vec![byte]))
                .unwrap();
        }
        assert_eq!(host.blob_count(), 3);

        embedder.revoke_created();
        assert_eq!(host.blob_count(), 1);
        assert!(host.blob(&other).is_some());
    }
}
