use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Model {
    Modnet,
    Rmbg14,
    Rmbg14Fp16,
    Rmbg14Quantized,
    #[default]
    U2NET,
    U2NETP,
}

/// Per-channel `(value / 255 - mean) / std` applied before inference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalization {
    pub const IMAGENET: Self = Self {
        mean: [0.485, 0.456, 0.406],
        std: [0.229, 0.224, 0.225],
    };

    pub const HALF: Self = Self {
        mean: [0.5, 0.5, 0.5],
        std: [0.5, 0.5, 0.5],
    };

    pub const CENTERED: Self = Self {
        mean: [0.5, 0.5, 0.5],
        std: [1.0, 1.0, 1.0],
    };

    pub fn apply(&self, channel: usize, value: u8) -> f32 {
        (value as f32 / 255.0 - self.mean[channel]) / self.std[channel]
    }
}

impl Model {
    pub fn all_models() -> Vec<Self> {
        vec![
            Self::Modnet,
            Self::Rmbg14,
            Self::Rmbg14Fp16,
            Self::Rmbg14Quantized,
            Self::U2NET,
            Self::U2NETP,
        ]
    }

    pub fn to_input_size(&self) -> (u32, u32) {
        match self {
            Model::Modnet => (512, 512),
            Model::Rmbg14 | Model::Rmbg14Fp16 | Model::Rmbg14Quantized => (1024, 1024),
            Model::U2NET | Model::U2NETP => (320, 320),
        }
    }

    pub fn normalization(&self) -> Normalization {
        match self {
            Model::Modnet => Normalization::HALF,
            Model::Rmbg14 | Model::Rmbg14Fp16 | Model::Rmbg14Quantized => Normalization::CENTERED,
            Model::U2NET | Model::U2NETP => Normalization::IMAGENET,
        }
    }

    /// U2-Net style models emit an unnormalized saliency map that has to be
    /// stretched to the full [0, 1] range.
    pub fn stretch_mask(&self) -> bool {
        matches!(self, Model::U2NET | Model::U2NETP)
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Modnet => "modnet_photographic_portrait_matting.onnx",
            Self::Rmbg14 => "rmbg-1.4.onnx",
            Self::Rmbg14Fp16 => "rmbg-1.4_fp16.onnx",
            Self::Rmbg14Quantized => "rmbg-1.4_quantized.onnx",
            Self::U2NET => "u2net.onnx",
            Self::U2NETP => "u2netp.onnx",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::all_models()
            .into_iter()
            .find(|model| model.file_name() == name)
    }

    pub fn download_url(&self) -> &'static str {
        match self {
            Self::Modnet => {
                "https://huggingface.co/TheEeeeLin/HivisionIDPhotos_matting/resolve/034769305faf641ad94edfac654aba13be06e816/modnet_photographic_portrait_matting.onnx"
            }
            Self::Rmbg14 => "https://huggingface.co/briaai/RMBG-1.4/resolve/main/onnx/model.onnx",
            Self::Rmbg14Fp16 => {
                "https://huggingface.co/briaai/RMBG-1.4/resolve/main/onnx/model_fp16.onnx"
            }
            Self::Rmbg14Quantized => {
                "https://huggingface.co/briaai/RMBG-1.4/resolve/main/onnx/model_quantized.onnx"
            }
            Self::U2NET => "https://huggingface.co/AlenZeng/u2netonnxmodel/resolve/main/u2net.onnx",
            Self::U2NETP => {
                "https://huggingface.co/martintomov/comfy/resolve/1b0c3477e152d8a2dea8e4e418a6dba32de56fda/rembg/u2netp.onnx"
            }
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name().trim_end_matches(".onnx"))
    }
}
